// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装 Prometheus 导出器
///
/// 未启用或地址非法时只记录日志，不影响服务启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    // Address may already be in use in development
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    metrics::describe_counter!("tariffrs_scrape_jobs_total", "Scrape jobs by final status");
    metrics::describe_counter!(
        "tariffrs_candidate_fetches_total",
        "Candidate fetches by outcome"
    );
    metrics::describe_histogram!(
        "tariffrs_scrape_job_duration_seconds",
        "Scrape job wall-clock duration"
    );

    info!("Metrics exporter listening on {}", addr);
}
