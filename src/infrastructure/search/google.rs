// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::{SearchEngine, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Custom Search API 单次请求最多返回的结果数
const MAX_NUM_PER_REQUEST: u32 = 10;
/// Custom Search API 允许的最大结果偏移
const MAX_RESULT_INDEX: u32 = 100;

/// Google Custom Search JSON API 搜索引擎
pub struct GoogleSearchEngine {
    client: Client,
    base_url: String,
    api_key: String,
    cx: String,
}

impl GoogleSearchEngine {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        cx: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            cx: cx.into(),
        })
    }

    /// 请求一页结果，`start` 从 1 开始
    async fn fetch_page(&self, query: &str, start: u32, num: u32) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query),
                ("start", &start.to_string()),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::NetworkError(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SearchError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(SearchError::EngineError(format!(
                "Google Search API error: {}",
                status
            )));
        }

        let google_resp: GoogleSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::EngineError(format!("Invalid Google response: {}", e)))?;

        Ok(google_resp
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| SearchResult::new(item.title, item.link, item.snippet, "google".to_string()))
            .collect())
    }
}

#[async_trait]
impl SearchEngine for GoogleSearchEngine {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EngineError(
                "Search query cannot be empty".to_string(),
            ));
        }

        let limit = limit.min(MAX_RESULT_INDEX);
        let mut results: Vec<SearchResult> = Vec::with_capacity(limit as usize);
        let mut start = 1;

        while (results.len() as u32) < limit && start <= MAX_RESULT_INDEX {
            let num = (limit - results.len() as u32)
                .min(MAX_NUM_PER_REQUEST)
                .min(MAX_RESULT_INDEX + 1 - start);
            let page = self.fetch_page(query, start, num).await?;
            debug!("Google page at start={}: {} results", start, page.len());

            let exhausted = (page.len() as u32) < num;
            results.extend(page);
            if exhausted {
                break;
            }
            start += num;
        }

        results.truncate(limit as usize);
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    items: Option<Vec<GoogleSearchItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleSearchItem {
    title: String,
    link: String,
    snippet: Option<String>,
}
