// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::QueryRejection, Extension, Json, Query},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    application::dto::scrape_request::ScrapeQueryDto,
    config::settings::Settings,
    domain::{
        models::scrape_job::{RequestValidationError, ScrapeRequest},
        services::scrape_job_service::ScrapeJobService,
    },
    presentation::errors::AppError,
};

/// 处理抓取请求
///
/// # 参数
///
/// * `service` - 任务编排服务
/// * `settings` - 应用配置，提供任务超时
/// * `query` - 查询参数 `query`、`maxResults`、`minYear`
///
/// # 返回值
///
/// 成功时返回任务报告（状态为 COMPLETED 或 PARTIAL）
///
/// # 错误
///
/// - 参数校验失败：400，不会创建任务
/// - 搜索不可用：502，附带任务报告
/// - 所有候选失败：500，附带任务报告
/// - 超过任务超时：504
pub async fn scrape(
    Extension(service): Extension<Arc<ScrapeJobService>>,
    Extension(settings): Extension<Arc<Settings>>,
    query: Result<Query<ScrapeQueryDto>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(dto) = query
        .map_err(|rejection| RequestValidationError::single("queryString", rejection.body_text()))?;
    let request = ScrapeRequest::try_from(dto)?;

    info!(
        query = %request.query(),
        max_results = request.max_results(),
        min_year = request.min_year(),
        "Scrape request accepted"
    );

    let report = service
        .run_with_cancel(request, tokio::time::sleep(settings.job_timeout()))
        .await?;

    Ok(Json(report))
}
