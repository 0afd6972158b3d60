// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_server, test_settings, StubFetcher, StubSearchEngine, TARIFF_ARTICLE,
    WEATHER_ARTICLE,
};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tariffrs::domain::search::engine::SearchError;

fn three_candidate_server() -> axum_test::TestServer {
    create_test_server(
        Arc::new(StubSearchEngine::returning(&[
            "https://news.example.com/steel",
            "https://blog.example.com/weather",
            "https://down.example.com/page",
        ])),
        Arc::new(StubFetcher::with_pages(&[
            ("https://news.example.com/steel", TARIFF_ARTICLE),
            ("https://blog.example.com/weather", WEATHER_ARTICLE),
        ])),
        test_settings(&[]),
    )
}

#[tokio::test]
async fn scrape_returns_partial_report() {
    let server = three_candidate_server();

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .add_query_param("maxResults", "5")
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["query"], "steel tariffs");
    assert_eq!(body["status"], "PARTIAL");
    assert_eq!(body["totalSourcesFound"], 3);
    assert_eq!(body["sourcesScraped"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["url"], "https://news.example.com/steel");
    assert_eq!(results[0]["sourceDomain"], "news.example.com");
    assert_eq!(results[0]["tariffRate"], 25.0);
    assert_eq!(results[0]["year"], 2024);
    assert_eq!(results[0]["exporter"], "China");
    assert_eq!(results[0]["importer"], "Canada");
    assert!(results[0]["relevantText"].as_array().unwrap().len() <= 5);

    let failures = body["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["url"], "https://down.example.com/page");
    assert_eq!(failures[0]["reason"], "Unexpected HTTP status 503");
}

#[tokio::test]
async fn scrape_min_year_filters_results() {
    let server = three_candidate_server();

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .add_query_param("minYear", "2025")
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "PARTIAL");
    assert_eq!(body["sourcesScraped"], 2);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn scrape_rejects_invalid_parameters_without_searching() {
    let engine = StubSearchEngine::returning(&["https://news.example.com/steel"]);
    let calls = engine.calls();
    let server = create_test_server(
        Arc::new(engine),
        Arc::new(StubFetcher::with_pages(&[])),
        test_settings(&[]),
    );

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "x")
        .add_query_param("maxResults", "0")
        .add_query_param("minYear", "abc")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("request validation failed"));
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["maxResults", "minYear", "query"]);

    let missing = server.get("/api/v1/scrape").await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = missing.json();
    assert_eq!(body["fields"][0]["field"], "query");
    assert_eq!(body["fields"][0]["message"], "query is required");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scrape_discovery_failure_is_bad_gateway() {
    let server = create_test_server(
        Arc::new(StubSearchEngine::failing(SearchError::NetworkError(
            "connection refused".to_string(),
        ))),
        Arc::new(StubFetcher::with_pages(&[])),
        test_settings(&[]),
    );

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
    assert_eq!(body["report"]["status"], "FAILED");
    assert_eq!(body["report"]["totalSourcesFound"], 0);
    assert_eq!(body["report"]["sourcesScraped"], 0);
}

#[tokio::test]
async fn scrape_all_failures_is_internal_error() {
    let server = create_test_server(
        Arc::new(StubSearchEngine::returning(&[
            "https://down.example.com/1",
            "https://down.example.com/2",
        ])),
        Arc::new(StubFetcher::with_pages(&[])),
        test_settings(&[]),
    );

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["report"]["status"], "FAILED");
    assert_eq!(body["report"]["totalSourcesFound"], 2);
    assert_eq!(body["report"]["failures"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn scrape_without_candidates_completes() {
    let server = create_test_server(
        Arc::new(StubSearchEngine::returning(&[])),
        Arc::new(StubFetcher::with_pages(&[])),
        test_settings(&[]),
    );

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["totalSourcesFound"], 0);
}

#[tokio::test]
async fn scrape_past_job_deadline_is_gateway_timeout() {
    let server = create_test_server(
        Arc::new(StubSearchEngine::returning(&["https://news.example.com/steel"])),
        Arc::new(
            StubFetcher::with_pages(&[("https://news.example.com/steel", TARIFF_ARTICLE)])
                .delayed(Duration::from_secs(3)),
        ),
        test_settings(&[("scraper.job_timeout_secs", "1")]),
    );

    let response = server
        .get("/api/v1/scrape")
        .add_query_param("query", "steel tariffs")
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("aborted"));
    assert!(body.get("report").is_none());
}
