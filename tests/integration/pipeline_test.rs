// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 完整抓取流程测试：Bing 结果页与候选页面都由 wiremock 提供

use super::helpers::{create_test_server, test_settings, TARIFF_ARTICLE, WEATHER_ARTICLE};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tariffrs::engines::reqwest_engine::ReqwestEngine;
use tariffrs::infrastructure::search::bing::BingSearchEngine;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bing_page(base: &str) -> String {
    format!(
        r#"<html><body><ol id="b_results">
        <li class="b_algo"><h2><a href="{base}/articles/steel">Canada steel tariffs</a></h2><p>Steel duties</p></li>
        <li class="b_algo"><h2><a href="{base}/articles/weather">Weather</a></h2></li>
        <li class="b_algo"><h2><a href="{base}/articles/gone">Gone</a></h2></li>
        </ol></body></html>"#
    )
}

#[tokio::test]
async fn bing_discovery_and_http_fetch_end_to_end() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "steel tariffs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bing_page(&base), "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/articles/steel"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TARIFF_ARTICLE, "text/html"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/articles/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(WEATHER_ARTICLE, "text/html"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/articles/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let engine =
        BingSearchEngine::new(format!("{}/search", base), Duration::from_secs(5)).unwrap();
    let fetcher = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let server = create_test_server(Arc::new(engine), Arc::new(fetcher), test_settings(&[]));

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .add_query_param("maxResults", "5")
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "PARTIAL");
    assert_eq!(body["totalSourcesFound"], 3);
    assert_eq!(body["sourcesScraped"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["url"], format!("{}/articles/steel", base));
    assert_eq!(results[0]["title"], "Canada steel tariffs");
    assert_eq!(results[0]["tariffRate"], 25.0);
    assert_eq!(results[0]["product"], "steel");

    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["url"], format!("{}/articles/gone", base));
    assert_eq!(failures[0]["reason"], "Unexpected HTTP status 404");
}

#[tokio::test]
async fn bing_captcha_page_fails_discovery() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><title>Robot Check</title><body>please solve the captcha</body></html>",
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    let engine = BingSearchEngine::new(
        format!("{}/search", mock_server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let fetcher = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let server = create_test_server(Arc::new(engine), Arc::new(fetcher), test_settings(&[]));

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Rate limit exceeded"));
    assert_eq!(body["report"]["status"], "FAILED");
}
