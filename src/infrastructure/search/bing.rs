// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::{SearchEngine, SearchError};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const RESULTS_PER_PAGE: u32 = 10;
const MAX_PAGES: u32 = 10;
const PAGE_BATCH_SIZE: usize = 3;
const BING_REDIRECT_PREFIX: &str = "https://www.bing.com/ck/a?";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static RESULT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<li class="b_algo"[^>]*>(.*?)</li>"#).unwrap());
static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)<h2[^>]*>(.*?)</h2>"#).unwrap());
static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a[^>]*href="([^"]*)"[^>]*>"#).unwrap());
static SNIPPET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)<p[^>]*>(.*?)</p>"#).unwrap());
static HTML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<[^>]+>"#).unwrap());

/// Bing search engine backed by HTML result pages
///
/// Results are scraped from the public search page, in page order, with
/// Bing `ck/a` redirect links decoded to their destination.
pub struct BingSearchEngine {
    client: reqwest::Client,
    base_url: String,
}

impl BingSearchEngine {
    /// # Arguments
    /// * `base_url` - search endpoint, normally `https://www.bing.com/search`
    /// * `timeout` - per page request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SearchError::EngineError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the result page URL for a 1-based page number
    ///
    /// Page 2 and later carry `first=(page-1)*10+1` and the `FORM` marker
    /// Bing itself emits (`PERE`, then `PERE1`, `PERE2`, ...).
    pub fn build_bing_url(&self, query: &str, page: u32) -> String {
        let mut params = vec![("q", query.to_string()), ("pq", query.to_string())];

        if page > 1 {
            params.push(("first", ((page - 1) * RESULTS_PER_PAGE + 1).to_string()));
            let form_value = if page == 2 {
                "PERE".to_string()
            } else {
                format!("PERE{}", page - 2)
            };
            params.push(("FORM", form_value));
        }

        format!(
            "{}?{}",
            self.base_url,
            serde_urlencoded::to_string(&params).unwrap_or_default()
        )
    }

    /// Decode a Bing `ck/a` redirect link
    ///
    /// The `u` parameter holds `a1` followed by the URL-safe Base64 target.
    /// Anything that does not decode is returned unchanged.
    pub fn decode_bing_url(url: &str) -> String {
        if !url.starts_with(BING_REDIRECT_PREFIX) {
            return url.to_string();
        }

        let decoded = Url::parse(url).ok().and_then(|parsed| {
            let (_, value) = parsed.query_pairs().find(|(key, _)| key == "u")?;
            let encoded = value.get(2..)?;
            let padding = "=".repeat((4 - encoded.len() % 4) % 4);
            let bytes = URL_SAFE.decode(format!("{}{}", encoded, padding)).ok()?;
            String::from_utf8(bytes).ok()
        });

        decoded.unwrap_or_else(|| url.to_string())
    }

    /// Strip tags and decode entities
    ///
    /// * `<p>Hello <strong>world</strong></p>` → `Hello world`
    /// * `Test &amp; example` → `Test & example`
    pub fn clean_html_text(html: &str) -> String {
        let stripped = HTML_TAG_REGEX.replace_all(html, "");
        let decoded = html_escape::decode_html_entities(&stripped);
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Parse one Bing result page
    ///
    /// # Returns
    /// Results in page order; an anti-bot page yields `RateLimitExceeded`
    pub fn parse_search_results(html: &str) -> Result<Vec<SearchResult>, SearchError> {
        if html.trim().is_empty() {
            return Err(SearchError::EngineError(
                "Empty HTML response received".to_string(),
            ));
        }

        if html.contains("<title>Robot Check</title>") || html.contains("captcha") {
            return Err(SearchError::RateLimitExceeded);
        }

        if html.contains(r#"<div class="b_no">"#) || html.contains("No results found") {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(RESULTS_PER_PAGE as usize);
        let mut parse_errors = 0;

        for result_match in RESULT_REGEX.find_iter(html) {
            let result_html = result_match.as_str();

            let title_html = TITLE_REGEX
                .captures(result_html)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default();

            let url = LINK_REGEX
                .captures(title_html)
                .and_then(|cap| cap.get(1))
                .map(|m| Self::decode_bing_url(&html_escape::decode_html_entities(m.as_str())))
                .unwrap_or_default();

            let title = Self::clean_html_text(title_html);
            let snippet = SNIPPET_REGEX
                .captures(result_html)
                .and_then(|cap| cap.get(1))
                .map(|m| Self::clean_html_text(m.as_str()))
                .filter(|s| !s.is_empty());

            if title.is_empty() || !url.starts_with("http") {
                parse_errors += 1;
                continue;
            }

            results.push(SearchResult::new(title, url, snippet, "bing".to_string()));
        }

        if parse_errors > 0 {
            debug!(
                "Bing search parsing: {} valid results, {} parse errors",
                results.len(),
                parse_errors
            );
        }

        if results.is_empty() && parse_errors > 0 {
            return Err(SearchError::EngineError(
                "Failed to parse any search results from HTML response".to_string(),
            ));
        }

        Ok(results)
    }

    async fn fetch_page(&self, query: &str, page: u32) -> Result<String, SearchError> {
        let url = self.build_bing_url(query, page);
        let response = self
            .client
            .get(&url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Cookie", "_EDGE_CD=m=US&u=en; _EDGE_S=mkt=US&ui=en")
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SearchError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(SearchError::EngineError(format!(
                "HTTP error {} on page {}",
                status, page
            )));
        }

        response.text().await.map_err(map_request_error)
    }
}

fn map_request_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl SearchEngine for BingSearchEngine {
    /// Fetch as many result pages as `limit` needs, in batches of three
    ///
    /// A failing first page fails the search; later page failures only end
    /// pagination early.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EngineError(
                "Search query cannot be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let pages_needed = limit.div_ceil(RESULTS_PER_PAGE).clamp(1, MAX_PAGES);
        let pages: Vec<u32> = (1..=pages_needed).collect();
        let mut all_results: Vec<SearchResult> = Vec::new();

        'batches: for batch in pages.chunks(PAGE_BATCH_SIZE) {
            let responses = join_all(batch.iter().map(|&page| self.fetch_page(query, page))).await;

            for (&page, response) in batch.iter().zip(responses) {
                let page_results = match response.and_then(|html| Self::parse_search_results(&html))
                {
                    Ok(page_results) => page_results,
                    Err(e) if page == 1 => return Err(e),
                    Err(e) => {
                        warn!("Bing page {} failed, stopping pagination: {}", page, e);
                        break 'batches;
                    }
                };

                debug!("Bing page {}: {} results", page, page_results.len());
                if page_results.is_empty() {
                    break 'batches;
                }
                all_results.extend(page_results);
                if all_results.len() >= limit as usize {
                    break 'batches;
                }
            }
        }

        all_results.truncate(limit as usize);
        Ok(all_results)
    }

    fn name(&self) -> &'static str {
        "bing"
    }
}
