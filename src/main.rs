// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use tariffrs::config::settings::Settings;
use tariffrs::domain::services::candidate_discovery::CandidateDiscovery;
use tariffrs::domain::services::scrape_job_service::{ScrapeJobConfig, ScrapeJobService};
use tariffrs::engines::reqwest_engine::ReqwestEngine;
use tariffrs::engines::traits::FetchClient;
use tariffrs::engines::user_agent_pool::UserAgentPool;
use tariffrs::infrastructure::search::create_search_engine;
use tariffrs::presentation::routes;
use tariffrs::utils::telemetry;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting tariffrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    tariffrs::infrastructure::metrics::init_metrics(&settings.metrics);

    // 4. Initialize search and fetch engines
    let search_engine = create_search_engine(&settings.search)?;
    let discovery = CandidateDiscovery::new(
        search_engine,
        settings.discovery.overfetch_factor,
        settings.search_timeout(),
    );
    let fetcher: Arc<dyn FetchClient> = Arc::new(ReqwestEngine::new(settings.fetch_timeout())?);
    let user_agents = Arc::new(UserAgentPool::from_seed(settings.scraper.user_agent_seed));

    let service = Arc::new(ScrapeJobService::new(
        discovery,
        fetcher,
        user_agents,
        ScrapeJobConfig::from_settings(&settings),
    ));
    info!(
        max_concurrency = settings.scraper.max_concurrency,
        engine = %settings.search.engine,
        "Scrape job service initialized"
    );

    // 5. Start HTTP server
    let app = routes::routes(service, settings.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
