// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 可信的权威贸易数据来源域名
pub const TRUSTED_DOMAINS: [&str; 9] = [
    "wto.org",
    "trade.gov",
    "usitc.gov",
    "cbp.gov",
    "worldbank.org",
    "comtrade.un.org",
    "oecd.org",
    "export.gov",
    "trade-tariff.service.gov.uk",
];

const UNKNOWN_DOMAIN: &str = "unknown";

fn matching_trusted_domain(url: &str) -> Option<&'static str> {
    TRUSTED_DOMAINS
        .iter()
        .copied()
        .find(|domain| url.contains(domain))
}

/// 提取URL的来源域名
///
/// URL包含可信域名时返回该域名字面量（`https://www.wto.org/x` 返回 `wto.org`），
/// 否则返回解析出的主机名，无法解析时返回 `unknown`。
pub fn extract_domain(url: &str) -> String {
    if let Some(domain) = matching_trusted_domain(url) {
        return domain.to_string();
    }

    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// 判断URL是否来自可信来源
pub fn is_trusted_source(url: &str) -> bool {
    !url.is_empty() && matching_trusted_domain(url).is_some()
}
