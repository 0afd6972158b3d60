// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use tariffrs::domain::models::scrape_job::RequestValidationError;
use tariffrs::domain::services::scrape_job_service::ScrapeJobError;
use tariffrs::presentation::errors::AppError;

async fn render(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn validation_error_maps_to_bad_request_with_fields() {
    let (status, body) = render(AppError::from(RequestValidationError::single(
        "maxResults",
        "maxResults must be between 1 and 50",
    )))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "maxResults");
    assert_eq!(
        body["error"],
        "request validation failed: maxResults must be between 1 and 50"
    );
}

#[tokio::test]
async fn aborted_job_maps_to_gateway_timeout() {
    let (status, body) = render(AppError::from(ScrapeJobError::Aborted(
        "deadline reached".to_string(),
    )))
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "scrape job aborted: deadline reached");
    assert!(body.get("report").is_none());
}

#[tokio::test]
async fn unknown_error_maps_to_internal_error() {
    let (status, body) = render(AppError::from(anyhow::anyhow!("boom"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "boom");
}
