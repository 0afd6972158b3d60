// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tariffrs::config::settings::Settings;
use tariffrs::domain::models::search_result::SearchResult;
use tariffrs::domain::search::engine::{SearchEngine, SearchError};
use tariffrs::domain::services::candidate_discovery::CandidateDiscovery;
use tariffrs::domain::services::scrape_job_service::{ScrapeJobConfig, ScrapeJobService};
use tariffrs::engines::traits::{EngineError, FetchClient, FetchRequest, FetchResponse};
use tariffrs::engines::user_agent_pool::UserAgentPool;
use tariffrs::presentation::routes;

pub const TARIFF_ARTICLE: &str = r#"<html>
  <head><title>Steel duties</title></head>
  <body>
    <p>Canada imposed a 25% tariff on steel imports from China. Published: 2024.</p>
  </body>
</html>"#;

pub const WEATHER_ARTICLE: &str = "<html><body><p>Sunny skies all week.</p></body></html>";

/// 返回固定结果并记录调用次数的搜索引擎
pub struct StubSearchEngine {
    outcome: Result<Vec<SearchResult>, SearchError>,
    calls: Arc<AtomicUsize>,
}

impl StubSearchEngine {
    pub fn returning(urls: &[&str]) -> Self {
        let hits = urls
            .iter()
            .map(|url| SearchResult::new(format!("Title for {}", url), url.to_string(), None, "stub".to_string()))
            .collect();
        Self {
            outcome: Ok(hits),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: SearchError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl SearchEngine for StubSearchEngine {
    async fn search(&self, _query: &str, limit: u32) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map(|hits| hits.into_iter().take(limit as usize).collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 按URL返回固定页面的抓取客户端，未登记的URL返回503
pub struct StubFetcher {
    pages: Vec<(String, String)>,
    delay: Duration,
}

impl StubFetcher {
    pub fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl FetchClient for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.pages
            .iter()
            .find(|(url, _)| *url == request.url)
            .map(|(_, body)| FetchResponse {
                status_code: 200,
                content: body.clone(),
                content_type: "text/html".to_string(),
                response_time_ms: 1,
            })
            .ok_or(EngineError::HttpStatus(503))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 只包含内置默认值（可追加覆盖项）的配置
pub fn test_settings(overrides: &[(&str, &str)]) -> Settings {
    let mut builder = Settings::default_builder().unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }
    Settings::from_builder(builder).unwrap()
}

pub fn create_service(
    engine: Arc<dyn SearchEngine>,
    fetcher: Arc<dyn FetchClient>,
    settings: &Settings,
) -> Arc<ScrapeJobService> {
    let discovery = CandidateDiscovery::new(
        engine,
        settings.discovery.overfetch_factor,
        settings.search_timeout(),
    );
    Arc::new(ScrapeJobService::new(
        discovery,
        fetcher,
        Arc::new(UserAgentPool::with_seed(1)),
        ScrapeJobConfig::from_settings(settings),
    ))
}

pub fn create_test_server(
    engine: Arc<dyn SearchEngine>,
    fetcher: Arc<dyn FetchClient>,
    settings: Settings,
) -> TestServer {
    let service = create_service(engine, fetcher, &settings);
    TestServer::new(routes::routes(service, Arc::new(settings))).unwrap()
}
