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

use super::helpers::{create_test_server, test_settings, StubFetcher, StubSearchEngine};
use axum::http::StatusCode;
use std::sync::Arc;

/// 健康检查测试
///
/// 验证健康检查端点和版本端点是否正常工作
#[tokio::test]
async fn health_check_works() {
    let server = create_test_server(
        Arc::new(StubSearchEngine::returning(&[])),
        Arc::new(StubFetcher::with_pages(&[])),
        test_settings(&[]),
    );

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");

    let version = server.get("/v1/version").await;
    version.assert_status(StatusCode::OK);
    version.assert_text(env!("CARGO_PKG_VERSION"));
}
