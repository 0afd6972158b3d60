// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 可信来源（url_trust）：来源域名识别与可信度判断
/// - 内容提取（content_extractor）：相关性过滤、税率/年份/国家/产品提取
/// - 候选发现（candidate_discovery）：搜索、去重、排序和截断
/// - 任务编排（scrape_job_service）：驱动完整的抓取任务并汇总报告
pub mod candidate_discovery;
pub mod content_extractor;
pub mod scrape_job_service;
pub mod url_trust;
