// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{
    FieldViolation, RequestValidationError, ScrapeRequest, DEFAULT_MAX_RESULTS, DEFAULT_MIN_YEAR,
};
use serde::Deserialize;

/// 抓取查询参数
///
/// 数值参数以字符串接收，解析失败时返回字段级错误而不是整体拒绝
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeQueryDto {
    pub query: Option<String>,
    pub max_results: Option<String>,
    pub min_year: Option<String>,
}

fn parse_integer(
    field: &str,
    value: Option<&str>,
    default: i64,
    violations: &mut Vec<FieldViolation>,
) -> i64 {
    match value.map(str::trim) {
        None | Some("") => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            violations.push(FieldViolation {
                field: field.to_string(),
                message: format!("{} must be an integer", field),
            });
            default
        }),
    }
}

impl TryFrom<ScrapeQueryDto> for ScrapeRequest {
    type Error = RequestValidationError;

    fn try_from(dto: ScrapeQueryDto) -> Result<Self, Self::Error> {
        let mut violations = Vec::new();
        let max_results = parse_integer(
            "maxResults",
            dto.max_results.as_deref(),
            DEFAULT_MAX_RESULTS,
            &mut violations,
        );
        let min_year = parse_integer(
            "minYear",
            dto.min_year.as_deref(),
            DEFAULT_MIN_YEAR,
            &mut violations,
        );
        let Some(query) = dto.query else {
            violations.push(FieldViolation {
                field: "query".to_string(),
                message: "query is required".to_string(),
            });
            return Err(RequestValidationError { fields: violations });
        };

        match ScrapeRequest::new(query, max_results, min_year) {
            Ok(request) if violations.is_empty() => Ok(request),
            Ok(_) => Err(RequestValidationError { fields: violations }),
            Err(mut err) => {
                // Unparsable fields replace the range errors computed from their defaults
                err.fields
                    .retain(|f| !violations.iter().any(|v| v.field == f.field));
                err.fields.extend(violations);
                err.fields.sort_by(|a, b| a.field.cmp(&b.field));
                Err(err)
            }
        }
    }
}
