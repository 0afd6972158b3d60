// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索服务模块
///
/// 提供搜索引擎的集成实现（Bing 结果页解析、Google Custom Search API）
/// 以及按配置选择引擎的工厂
pub mod bing;
pub mod factory;
pub mod google;

pub use factory::{create_search_engine, SearchEngineType};
