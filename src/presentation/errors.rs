// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::models::scrape_job::RequestValidationError;
use crate::domain::services::scrape_job_service::ScrapeJobError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        if let Some(err) = self.0.downcast_ref::<RequestValidationError>() {
            let body = Json(json!({ "error": error_message, "fields": err.fields }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, body) = match self.0.downcast_ref::<ScrapeJobError>() {
            Some(ScrapeJobError::DiscoveryUnavailable { report, .. }) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": error_message, "report": report }),
            ),
            Some(ScrapeJobError::JobFatal { report }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": error_message, "report": report }),
            ),
            Some(ScrapeJobError::Aborted(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, json!({ "error": error_message }))
            }
            Some(ScrapeJobError::State(_)) | None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": error_message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
