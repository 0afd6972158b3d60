// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 负责把外部请求转换为领域对象，领域逻辑本身位于 domain 层
pub mod dto;
