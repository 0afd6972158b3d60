// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取任务（scrape_job）：请求、任务报告、提取结果和失败记录
/// - 搜索结果（search_result）：搜索引擎返回的候选条目
pub mod scrape_job;
pub mod search_result;
