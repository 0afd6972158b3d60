// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::Candidate;
use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::domain::services::url_trust::is_trusted_source;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 单次搜索请求的结果数量上限
const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("search engine {engine} unavailable: {source}")]
    SearchUnavailable {
        engine: &'static str,
        #[source]
        source: SearchError,
    },
}

/// 候选发现服务
///
/// 将查询转换为有序、去重、有上限的候选列表，可信来源排在前面
pub struct CandidateDiscovery {
    engine: Arc<dyn SearchEngine>,
    overfetch_factor: usize,
    search_timeout: Duration,
}

impl CandidateDiscovery {
    pub fn new(engine: Arc<dyn SearchEngine>, overfetch_factor: usize, search_timeout: Duration) -> Self {
        Self {
            engine,
            overfetch_factor: overfetch_factor.max(1),
            search_timeout,
        }
    }

    /// 发现候选文档
    ///
    /// # 参数
    ///
    /// * `query` - 查询语句
    /// * `max_results` - 返回的最大候选数
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Candidate>)` - 长度不超过 `max_results` 的候选列表
    /// * `Err(DiscoveryError)` - 搜索能力失败，不返回部分结果
    pub async fn discover(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, DiscoveryError> {
        let limit = max_results
            .saturating_mul(self.overfetch_factor)
            .clamp(1, MAX_SEARCH_LIMIT);
        let engine = self.engine.name();

        let hits = match tokio::time::timeout(
            self.search_timeout,
            self.engine.search(query, limit as u32),
        )
        .await
        {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!("Search engine {} failed: {}", engine, e);
                return Err(DiscoveryError::SearchUnavailable { engine, source: e });
            }
            Err(_) => {
                warn!("Search engine {} timed out", engine);
                return Err(DiscoveryError::SearchUnavailable {
                    engine,
                    source: SearchError::Timeout,
                });
            }
        };

        debug!("Search engine {} returned {} hits", engine, hits.len());
        let candidates = rank_candidates(hits, max_results);
        info!(
            engine,
            candidates = candidates.len(),
            "Candidate discovery finished"
        );
        Ok(candidates)
    }
}

/// 对搜索结果去重、排序并截断
///
/// 去掉空URL和非 http(s) URL，按URL去重（保留首次出现），
/// 可信来源稳定地排在非可信来源之前，最后截断到 `max_results`。
pub fn rank_candidates(hits: Vec<SearchResult>, max_results: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<Candidate> = hits
        .into_iter()
        .filter_map(|hit| {
            let url = hit.url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return None;
            }
            if !seen.insert(url.clone()) {
                return None;
            }
            Some(Candidate {
                url,
                title: hit.title.trim().to_string(),
            })
        })
        .collect();

    // sort_by_key is stable, so engine order survives within each tier
    candidates.sort_by_key(|candidate| !is_trusted_source(&candidate.url));
    candidates.truncate(max_results);
    candidates
}
