// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SearchSettings;
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::infrastructure::search::bing::BingSearchEngine;
use crate::infrastructure::search::google::GoogleSearchEngine;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 搜索引擎类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEngineType {
    /// Google Custom Search
    Google,
    /// Bing 搜索引擎
    Bing,
}

impl SearchEngineType {
    /// 获取引擎名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
        }
    }

    /// 从字符串解析引擎类型
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Some(Self::Google),
            "bing" => Some(Self::Bing),
            _ => None,
        }
    }
}

/// 根据配置创建搜索引擎
///
/// Google 需要同时配置 `google_api_key` 和 `google_cx`
pub fn create_search_engine(settings: &SearchSettings) -> Result<Arc<dyn SearchEngine>, SearchError> {
    let engine_type = SearchEngineType::parse(&settings.engine).ok_or_else(|| {
        SearchError::NotConfigured(format!("unknown search engine '{}'", settings.engine))
    })?;
    let timeout = Duration::from_secs(settings.timeout_secs);

    let engine: Arc<dyn SearchEngine> = match engine_type {
        SearchEngineType::Bing => Arc::new(BingSearchEngine::new(&settings.bing_base_url, timeout)?),
        SearchEngineType::Google => {
            let (Some(api_key), Some(cx)) = (&settings.google_api_key, &settings.google_cx) else {
                return Err(SearchError::NotConfigured(
                    "google requires search.google_api_key and search.google_cx".to_string(),
                ));
            };
            Arc::new(GoogleSearchEngine::new(
                &settings.google_base_url,
                api_key,
                cx,
                timeout,
            )?)
        }
    };

    info!("Using search engine: {}", engine_type.name());
    Ok(engine)
}
