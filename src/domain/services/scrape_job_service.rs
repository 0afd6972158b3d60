// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::scrape_job::{
    Candidate, CandidateOutcome, JobStateError, JobStatus, ScrapeRequest, ScrapeResponse,
    ScrapedData, SourceFailure,
};
use crate::domain::services::candidate_discovery::{CandidateDiscovery, DiscoveryError};
use crate::domain::services::content_extractor::{
    clean_text, contains_tariff_keywords, extract_product, extract_rate, extract_trade_parties,
    extract_year_from_text, relevant_passages,
};
use crate::domain::services::url_trust::extract_domain;
use crate::engines::traits::{FetchClient, FetchRequest, FetchResponse};
use crate::engines::user_agent_pool::{fix_encoding, UserAgentPool};
use crate::utils::html_text::{extract_publish_date, extract_title, html_to_text};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// 任务级错误
#[derive(Debug, Error)]
pub enum ScrapeJobError {
    /// 候选发现失败，任务整体失败
    #[error("candidate discovery unavailable: {source}")]
    DiscoveryUnavailable {
        #[source]
        source: DiscoveryError,
        report: Box<ScrapeResponse>,
    },
    /// 所有候选都失败
    #[error("all {} candidates failed", .report.total_sources_found())]
    JobFatal { report: Box<ScrapeResponse> },
    /// 任务在完成前被取消
    #[error("scrape job aborted: {0}")]
    Aborted(String),
    #[error("job state error: {0}")]
    State(#[from] JobStateError),
}

/// 单个候选的提取错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("document has no text content")]
    EmptyDocument,
}

/// 任务运行参数
#[derive(Debug, Clone)]
pub struct ScrapeJobConfig {
    /// 同时进行的抓取数量
    pub max_concurrency: usize,
    /// 单次抓取超时
    pub fetch_timeout: Duration,
    /// 每个结果保留的最大段落数
    pub max_passages: usize,
    /// 每个段落的最大字符数
    pub max_passage_chars: usize,
}

impl Default for ScrapeJobConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            fetch_timeout: Duration::from_secs(15),
            max_passages: 5,
            max_passage_chars: 500,
        }
    }
}

impl ScrapeJobConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_concurrency: settings.scraper.max_concurrency.max(1),
            fetch_timeout: Duration::from_secs(settings.scraper.fetch_timeout_secs),
            max_passages: settings.extraction.max_passages,
            max_passage_chars: settings.extraction.max_passage_chars,
        }
    }
}

/// 抓取任务编排服务
///
/// 驱动 发现 → 抓取 → 提取 → 过滤 → 汇总 的完整流程，
/// 持有任务状态机和失败统计。工作单元只返回结果，
/// 任务报告只在这里被修改。
pub struct ScrapeJobService {
    discovery: CandidateDiscovery,
    fetcher: Arc<dyn FetchClient>,
    user_agents: Arc<UserAgentPool>,
    config: ScrapeJobConfig,
}

impl ScrapeJobService {
    pub fn new(
        discovery: CandidateDiscovery,
        fetcher: Arc<dyn FetchClient>,
        user_agents: Arc<UserAgentPool>,
        config: ScrapeJobConfig,
    ) -> Self {
        Self {
            discovery,
            fetcher,
            user_agents,
            config,
        }
    }

    /// 执行抓取任务
    ///
    /// # 参数
    ///
    /// * `request` - 已校验的抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResponse)` - 状态为 Completed 或 Partial 的任务报告
    /// * `Err(ScrapeJobError)` - 发现失败或所有候选失败，错误中携带已冻结的报告
    pub async fn run(&self, request: ScrapeRequest) -> Result<ScrapeResponse, ScrapeJobError> {
        let job_id = Uuid::new_v4();
        let span = info_span!("scrape_job", %job_id, query = %request.query());
        let started = Instant::now();

        let result = self.execute(&request).instrument(span).await;

        let status = match &result {
            Ok(report) => report.status().as_str(),
            Err(ScrapeJobError::Aborted(_)) => "ABORTED",
            Err(_) => JobStatus::Failed.as_str(),
        };
        metrics::counter!("tariffrs_scrape_jobs_total", "status" => status).increment(1);
        metrics::histogram!("tariffrs_scrape_job_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        result
    }

    /// 执行抓取任务，`cancel` 先完成时中止任务
    ///
    /// 中止时正在进行的抓取会被丢弃，不返回部分报告
    pub async fn run_with_cancel<F>(
        &self,
        request: ScrapeRequest,
        cancel: F,
    ) -> Result<ScrapeResponse, ScrapeJobError>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                warn!(query = %request.query(), "Scrape job cancelled before completion");
                metrics::counter!("tariffrs_scrape_jobs_total", "status" => "ABORTED").increment(1);
                Err(ScrapeJobError::Aborted(
                    "job was cancelled before completion".to_string(),
                ))
            }
            result = self.run(request.clone()) => result,
        }
    }

    async fn execute(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, ScrapeJobError> {
        let mut report = ScrapeResponse::new(request.query());

        let candidates = match self
            .discovery
            .discover(request.query(), request.max_results())
            .await
        {
            Ok(candidates) => candidates,
            Err(source) => {
                warn!("Discovery failed: {}", source);
                report.fail()?;
                return Err(ScrapeJobError::DiscoveryUnavailable {
                    source,
                    report: Box::new(report),
                });
            }
        };

        report.start()?;
        let total = candidates.len();
        info!(
            candidates = total,
            concurrency = self.config.max_concurrency,
            "Starting candidate fetches"
        );

        let mut outcomes = stream::iter(candidates)
            .map(|candidate| self.process_candidate(candidate))
            .buffer_unordered(self.config.max_concurrency.max(1));

        while let Some(outcome) = outcomes.next().await {
            self.apply_outcome(&mut report, outcome, request.min_year())?;
        }

        let status = report.finalize(total)?;
        info!(
            status = %status,
            total_sources_found = report.total_sources_found(),
            sources_scraped = report.sources_scraped(),
            results = report.results().len(),
            failures = report.failures().len(),
            "Scrape job finished"
        );

        match status {
            JobStatus::Failed => Err(ScrapeJobError::JobFatal {
                report: Box::new(report),
            }),
            _ => Ok(report),
        }
    }

    fn apply_outcome(
        &self,
        report: &mut ScrapeResponse,
        outcome: CandidateOutcome,
        min_year: i32,
    ) -> Result<(), JobStateError> {
        match outcome {
            CandidateOutcome::Failed(failure) => {
                warn!(url = %failure.url, reason = %failure.reason, "Candidate failed");
                metrics::counter!("tariffrs_candidate_fetches_total", "outcome" => "failed")
                    .increment(1);
                report.record_failure(failure)
            }
            CandidateOutcome::Irrelevant { url } => {
                debug!(%url, "Candidate not relevant, dropped");
                metrics::counter!("tariffrs_candidate_fetches_total", "outcome" => "irrelevant")
                    .increment(1);
                report.record_scraped_without_result()
            }
            CandidateOutcome::Relevant(data) => {
                if let Some(year) = data.year.filter(|year| *year < min_year) {
                    debug!(url = %data.url, year, min_year, "Candidate older than minYear, dropped");
                    metrics::counter!("tariffrs_candidate_fetches_total", "outcome" => "too_old")
                        .increment(1);
                    return report.record_scraped_without_result();
                }
                metrics::counter!("tariffrs_candidate_fetches_total", "outcome" => "relevant")
                    .increment(1);
                if !report.record_result(data)? {
                    debug!("Duplicate result URL ignored");
                }
                Ok(())
            }
        }
    }

    async fn process_candidate(&self, candidate: Candidate) -> CandidateOutcome {
        let request = FetchRequest {
            url: fix_encoding(&candidate.url),
            user_agent: self.user_agents.random_user_agent().to_string(),
            timeout: self.config.fetch_timeout,
        };

        let response =
            match tokio::time::timeout(self.config.fetch_timeout, self.fetcher.fetch(&request))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    return CandidateOutcome::Failed(SourceFailure::new(
                        candidate.url,
                        e.to_string(),
                    ))
                }
                Err(_) => {
                    return CandidateOutcome::Failed(SourceFailure::new(
                        candidate.url,
                        format!("fetch timed out after {:?}", self.config.fetch_timeout),
                    ))
                }
            };

        debug!(
            url = %candidate.url,
            engine = self.fetcher.name(),
            response_time_ms = response.response_time_ms,
            "Candidate fetched"
        );

        match extract_scraped_data(&candidate, &response, &self.config) {
            Ok(Some(data)) => CandidateOutcome::Relevant(data),
            Ok(None) => CandidateOutcome::Irrelevant { url: candidate.url },
            Err(e) => CandidateOutcome::Failed(SourceFailure::new(candidate.url, e.to_string())),
        }
    }
}

fn is_textual(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.trim().is_empty()
        || content_type.starts_with("text/")
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.contains("json")
}

/// 从抓取结果构建 `ScrapedData`
///
/// # 返回值
///
/// * `Ok(Some(ScrapedData))` - 文档相关
/// * `Ok(None)` - 文档未通过相关性过滤
/// * `Err(ExtractionError)` - 内容无法作为文本处理
pub(crate) fn extract_scraped_data(
    candidate: &Candidate,
    response: &FetchResponse,
    config: &ScrapeJobConfig,
) -> Result<Option<ScrapedData>, ExtractionError> {
    if !is_textual(&response.content_type) {
        return Err(ExtractionError::UnsupportedContentType(
            response.content_type.clone(),
        ));
    }

    let text = clean_text(&html_to_text(&response.content));
    if text.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    if !contains_tariff_keywords(&text) {
        return Ok(None);
    }

    let title = if candidate.title.is_empty() {
        extract_title(&response.content).unwrap_or_default()
    } else {
        candidate.title.clone()
    };

    let mut data = ScrapedData::new(candidate.url.clone(), title, extract_domain(&candidate.url));
    data.relevant_text = relevant_passages(&text, config.max_passages, config.max_passage_chars);

    // Passages carry the tariff context; fall back to the whole document
    let focus = if data.relevant_text.is_empty() {
        text.clone()
    } else {
        data.relevant_text.join(" ")
    };

    data.tariff_rate = extract_rate(&focus).or_else(|| extract_rate(&text));
    data.year = extract_year_from_text(&text);
    let parties = extract_trade_parties(&focus);
    data.exporter = parties.exporter;
    data.importer = parties.importer;
    data.product = extract_product(&focus).or_else(|| extract_product(&text));
    data.publish_date = extract_publish_date(&response.content);

    Ok(Some(data))
}

#[cfg(test)]
#[path = "scrape_job_service_test.rs"]
mod tests;
