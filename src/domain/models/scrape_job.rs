// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// 默认返回的最大候选数量
pub const DEFAULT_MAX_RESULTS: i64 = 10;
/// 默认的最早年份
pub const DEFAULT_MIN_YEAR: i64 = 2020;

/// 抓取任务请求
///
/// 每个任务构造一次，构造时完成边界校验，之后不可变。
/// 校验失败时不会产生任何任务对象。
#[derive(Debug, Clone, Validate)]
pub struct ScrapeRequest {
    #[validate(length(
        min = 2,
        max = 200,
        message = "query must be between 2 and 200 characters"
    ))]
    query: String,
    #[validate(range(min = 1, max = 50, message = "maxResults must be between 1 and 50"))]
    max_results: i64,
    #[validate(range(
        min = 2000,
        max = 2030,
        message = "minYear must be between 2000 and 2030"
    ))]
    min_year: i64,
}

impl ScrapeRequest {
    /// 创建并校验抓取请求
    ///
    /// # 参数
    ///
    /// * `query` - 查询语句，首尾空白会被去除
    /// * `max_results` - 最大候选数量（1-50）
    /// * `min_year` - 最早年份（2000-2030）
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeRequest)` - 校验通过的请求
    /// * `Err(RequestValidationError)` - 字段级校验错误
    pub fn new(
        query: impl Into<String>,
        max_results: i64,
        min_year: i64,
    ) -> Result<Self, RequestValidationError> {
        let request = Self {
            query: query.into().trim().to_string(),
            max_results,
            min_year,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_results(&self) -> usize {
        self.max_results as usize
    }

    pub fn min_year(&self) -> i32 {
        self.min_year as i32
    }
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// 请求校验错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("request validation failed: {}", summarize(.fields))]
pub struct RequestValidationError {
    pub fields: Vec<FieldViolation>,
}

impl RequestValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }
}

fn summarize(fields: &[FieldViolation]) -> String {
    fields
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rust 字段名到查询参数名的映射
fn wire_field_name(field: &str) -> String {
    match field {
        "max_results" => "maxResults".to_string(),
        "min_year" => "minYear".to_string(),
        other => other.to_string(),
    }
}

impl From<ValidationErrors> for RequestValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let name = wire_field_name(field.as_ref());
                errs.iter().map(move |e| FieldViolation {
                    field: name.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { fields }
    }
}

/// 候选文档（已发现但尚未抓取的URL）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub title: String,
}

/// 从相关文档中提取出的关税信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedData {
    /// 文档URL，任务内唯一
    pub url: String,
    pub title: String,
    /// 来源域名，可信域名返回其字面量
    pub source_domain: String,
    /// 按原文顺序提取的相关段落
    pub relevant_text: Vec<String>,
    pub exporter: Option<String>,
    pub importer: Option<String>,
    pub product: Option<String>,
    pub year: Option<i32>,
    /// 按原文数值保留的关税税率
    pub tariff_rate: Option<f64>,
    pub publish_date: Option<String>,
}

impl ScrapedData {
    pub fn new(url: impl Into<String>, title: impl Into<String>, source_domain: String) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            source_domain,
            relevant_text: Vec::new(),
            exporter: None,
            importer: None,
            product: None,
            year: None,
            tariff_rate: None,
            publish_date: None,
        }
    }
}

/// 单个候选的失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub url: String,
    pub reason: String,
}

impl SourceFailure {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// 单个候选的处理结果
///
/// 由工作单元返回，只有编排器会把它写入任务报告
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// 抓取或提取失败
    Failed(SourceFailure),
    /// 抓取成功但未通过相关性过滤
    Irrelevant { url: String },
    /// 抓取成功且相关
    Relevant(ScrapedData),
}

/// 任务状态
///
/// 状态转换遵循以下流程：
/// Pending → Running → Completed/Partial/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Partial,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Partial => "PARTIAL",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Partial | JobStatus::Failed
        )
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Partial)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 任务报告状态错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobStateError {
    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("job report is frozen in {0} state")]
    Frozen(JobStatus),
    #[error("job report is not running (current state {0})")]
    NotRunning(JobStatus),
}

/// 任务报告
///
/// 任务开始时以 Pending 状态创建，只由编排器的汇总步骤修改，
/// 进入终态后冻结。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    query: String,
    status: JobStatus,
    total_sources_found: usize,
    sources_scraped: usize,
    results: Vec<ScrapedData>,
    failures: Vec<SourceFailure>,
}

impl ScrapeResponse {
    pub(crate) fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: JobStatus::Pending,
            total_sources_found: 0,
            sources_scraped: 0,
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn total_sources_found(&self) -> usize {
        self.total_sources_found
    }

    pub fn sources_scraped(&self) -> usize {
        self.sources_scraped
    }

    pub fn results(&self) -> &[ScrapedData] {
        &self.results
    }

    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), JobStateError> {
        if self.status.is_terminal() {
            return Err(JobStateError::Frozen(self.status));
        }
        if !self.status.can_transition_to(next) {
            return Err(JobStateError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), JobStateError> {
        match self.status {
            JobStatus::Running => Ok(()),
            status if status.is_terminal() => Err(JobStateError::Frozen(status)),
            status => Err(JobStateError::NotRunning(status)),
        }
    }

    pub(crate) fn start(&mut self) -> Result<(), JobStateError> {
        self.transition(JobStatus::Running)
    }

    /// 将任务直接置为失败（发现阶段失败时使用）
    pub(crate) fn fail(&mut self) -> Result<(), JobStateError> {
        self.transition(JobStatus::Failed)
    }

    pub(crate) fn record_failure(&mut self, failure: SourceFailure) -> Result<(), JobStateError> {
        self.ensure_running()?;
        self.failures.push(failure);
        Ok(())
    }

    /// 抓取成功但不产生结果（不相关或被年份过滤）
    pub(crate) fn record_scraped_without_result(&mut self) -> Result<(), JobStateError> {
        self.ensure_running()?;
        self.sources_scraped += 1;
        Ok(())
    }

    /// 记录一个结果；URL 已存在时只计数不追加
    pub(crate) fn record_result(&mut self, data: ScrapedData) -> Result<bool, JobStateError> {
        self.ensure_running()?;
        self.sources_scraped += 1;
        if self.results.iter().any(|existing| existing.url == data.url) {
            return Ok(false);
        }
        self.results.push(data);
        Ok(true)
    }

    /// 根据候选总数和失败数确定终态
    pub(crate) fn finalize(&mut self, total_candidates: usize) -> Result<JobStatus, JobStateError> {
        self.ensure_running()?;
        self.total_sources_found = total_candidates;
        let next = if total_candidates > 0 && self.failures.len() >= total_candidates {
            JobStatus::Failed
        } else if !self.failures.is_empty() {
            JobStatus::Partial
        } else {
            JobStatus::Completed
        };
        self.transition(next)?;
        Ok(next)
    }
}
