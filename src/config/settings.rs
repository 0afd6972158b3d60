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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、抓取任务、候选发现、搜索引擎、内容提取和指标等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取任务配置
    pub scraper: ScraperSettings,
    /// 候选发现配置
    pub discovery: DiscoverySettings,
    /// 搜索引擎配置
    pub search: SearchSettings,
    /// 内容提取配置
    pub extraction: ExtractionSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取任务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 同时进行的候选抓取数量
    pub max_concurrency: usize,
    /// 单次抓取超时时间（秒）
    pub fetch_timeout_secs: u64,
    /// 整个任务的超时时间（秒）
    pub job_timeout_secs: u64,
    /// User-Agent 选择的随机种子，未设置时使用系统熵
    pub user_agent_seed: Option<u64>,
}

/// 候选发现配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySettings {
    /// 向搜索引擎请求的结果数相对 maxResults 的倍数
    pub overfetch_factor: usize,
}

/// 搜索引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// 使用的搜索引擎 (bing, google)
    pub engine: String,
    /// 搜索超时时间（秒）
    pub timeout_secs: u64,
    /// Bing 搜索地址
    pub bing_base_url: String,
    /// Google Custom Search 地址
    pub google_base_url: String,
    /// Google API 密钥
    pub google_api_key: Option<String>,
    /// Google 搜索引擎ID
    pub google_cx: Option<String>,
}

/// 内容提取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 每个结果保留的相关段落数
    pub max_passages: usize,
    /// 每个段落的最大字符数
    pub max_passage_chars: usize,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出端点监听地址
    pub listen_addr: String,
}

const SUPPORTED_ENGINES: [&str; 2] = ["bing", "google"];

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `TARIFFRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败或取值非法
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::default_builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TARIFFRS").separator("__"));

        Self::from_builder(builder)
    }

    /// 只包含内置默认值的构建器
    pub fn default_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Job defaults
            .set_default("scraper.max_concurrency", 5)?
            .set_default("scraper.fetch_timeout_secs", 15)?
            .set_default("scraper.job_timeout_secs", 120)?
            .set_default("discovery.overfetch_factor", 2)?
            // Search defaults
            .set_default("search.engine", "bing")?
            .set_default("search.timeout_secs", 10)?
            .set_default("search.bing_base_url", "https://www.bing.com/search")?
            .set_default(
                "search.google_base_url",
                "https://www.googleapis.com/customsearch/v1",
            )?
            .set_default("extraction.max_passages", 5)?
            .set_default("extraction.max_passage_chars", 500)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 构建并校验配置
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.max_concurrency == 0 {
            return Err(ConfigError::Message(
                "scraper.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.scraper.fetch_timeout_secs == 0 || self.scraper.job_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "scraper timeouts must be greater than zero".to_string(),
            ));
        }
        if self.discovery.overfetch_factor == 0 {
            return Err(ConfigError::Message(
                "discovery.overfetch_factor must be at least 1".to_string(),
            ));
        }
        if !SUPPORTED_ENGINES.contains(&self.search.engine.as_str()) {
            return Err(ConfigError::Message(format!(
                "unsupported search.engine '{}', expected one of {:?}",
                self.search.engine, SUPPORTED_ENGINES
            )));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.fetch_timeout_secs)
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.job_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
