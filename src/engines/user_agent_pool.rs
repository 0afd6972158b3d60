// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// User-Agent 轮换池
///
/// 随机源归池所有，可以用固定种子创建以获得确定的序列
pub struct UserAgentPool {
    rng: Mutex<StdRng>,
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentPool {
    /// 使用系统熵创建
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 使用固定种子创建
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 配置了种子时使用种子，否则使用系统熵
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(Self::with_seed).unwrap_or_default()
    }

    pub fn agents() -> &'static [&'static str] {
        &USER_AGENTS
    }

    pub fn random_user_agent(&self) -> &'static str {
        let index = self.rng.lock().random_range(0..USER_AGENTS.len());
        USER_AGENTS[index]
    }
}

/// 修补搜索结果中未编码的 `|` 和空格
///
/// 只处理这两个字符，不做通用的百分号编码
pub fn fix_encoding(url: &str) -> String {
    url.replace('|', "%7C").replace(' ', "%20")
}
