// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use std::time::Duration;
use tariffrs::domain::search::engine::{SearchEngine, SearchError};
use tariffrs::infrastructure::search::google::GoogleSearchEngine;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn items(prefix: &str, count: usize) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "title": format!("{} result {}", prefix, i),
                "link": format!("https://{}.example.com/{}", prefix, i),
                "snippet": "tariff news"
            })
        })
        .collect();
    json!({ "items": items })
}

fn engine(server: &MockServer) -> GoogleSearchEngine {
    GoogleSearchEngine::new(
        format!("{}/customsearch/v1", server.uri()),
        "test-key",
        "test-cx",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn google_search_paginates_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "test-key"))
        .and(query_param("cx", "test-cx"))
        .and(query_param("q", "steel tariffs"))
        .and(query_param("start", "1"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items("first", 10)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .and(query_param("num", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items("second", 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let results = engine(&mock_server).search("steel tariffs", 15).await.unwrap();

    assert_eq!(results.len(), 15);
    assert_eq!(results[0].url, "https://first.example.com/0");
    assert_eq!(results[10].url, "https://second.example.com/0");
    assert_eq!(results[0].description.as_deref(), Some("tariff news"));
    assert!(results.iter().all(|r| r.engine == "google"));
}

#[tokio::test]
async fn google_search_stops_when_results_run_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let results = engine(&mock_server).search("rare query", 20).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn google_search_maps_http_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let err = engine(&mock_server).search("steel", 10).await.unwrap_err();
    assert_eq!(err, SearchError::RateLimitExceeded);
}
