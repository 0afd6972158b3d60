// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求参数到领域对象的转换
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含抓取任务模型、搜索接口和领域服务
pub mod domain;

/// 引擎模块
///
/// 实现候选文档的抓取客户端和 User-Agent 池
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如搜索引擎和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和错误映射
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
