// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：抓取任务、任务报告和搜索结果
/// - 搜索接口（search）：外部搜索能力的抽象
/// - 服务（services）：可信来源、内容提取、候选发现和任务编排
///
/// 领域层只依赖抽象接口，抓取和搜索的具体实现由引擎层和基础设施层提供。
pub mod models;
pub mod search;
pub mod services;
