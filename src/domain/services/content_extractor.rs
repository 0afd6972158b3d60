// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 关税内容提取
//!
//! 纯文本上的启发式提取函数，不做任何 I/O：
//! - 相关性过滤（关税关键词）
//! - 税率、年份提取
//! - 文本清理与段落切分
//! - 贸易国家与产品识别

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const TARIFF_KEYWORDS: [&str; 4] = ["tariff", "duty rate", "customs duty", "import duty"];

// The numeral must start the text or follow a non-numeric character
static RATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:^|[^\d.,])",
        r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d*\.\d+|\d+(?:\.\d+)?)",
        r"\s*(?:%|percent\b|per\s+cent\b)"
    ))
    .unwrap()
});

// Cue token, any run of separators and "on", optional "5 March" / "March 5," date prefix, then the year
static CONTEXT_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:\b(?:published|updated|effective|dated|copyright)\b|\bas\s+of\b|©)",
        r"(?:[\s:,\-–]|\bon\b)*(?:©\s*)?",
        r"(?:\d{1,2}(?:st|nd|rd|th)?\s+)?",
        r"(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:\d{1,2}(?:st|nd|rd|th)?,?\s+)?)?",
        r"(20\d{2})\b"
    ))
    .unwrap()
});

static FALLBACK_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(202\d)\b").unwrap());

static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").unwrap());

static PRODUCT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:tariffs?|duties|duty|levies)\s+on\s+(?:imported\s+|all\s+)?",
        r"([a-z][a-z\- ]{1,60}?)",
        r"(?:\s+(?:from|imports|imported|at|of|to|will|by|is|are|into|for|entering|that|which)\b|[.,;:()]|$)"
    ))
    .unwrap()
});

/// 国家名称及其别名（大小写敏感匹配）
const COUNTRY_ALIASES: &[(&str, &[&str])] = &[
    ("United States", &["United States", "U.S.", "USA", "US"]),
    ("China", &["China", "Chinese"]),
    ("European Union", &["European Union", "EU"]),
    ("United Kingdom", &["United Kingdom", "U.K.", "UK", "Britain"]),
    ("Canada", &["Canada", "Canadian"]),
    ("Mexico", &["Mexico", "Mexican"]),
    ("Japan", &["Japan", "Japanese"]),
    ("South Korea", &["South Korea", "Korea"]),
    ("India", &["India", "Indian"]),
    ("Brazil", &["Brazil", "Brazilian"]),
    ("Germany", &["Germany", "German"]),
    ("France", &["France", "French"]),
    ("Italy", &["Italy", "Italian"]),
    ("Vietnam", &["Vietnam", "Viet Nam", "Vietnamese"]),
    ("Australia", &["Australia", "Australian"]),
    ("Russia", &["Russia", "Russian"]),
    ("Turkey", &["Turkey", "Türkiye"]),
    ("Indonesia", &["Indonesia", "Indonesian"]),
    ("Taiwan", &["Taiwan"]),
    ("Switzerland", &["Switzerland", "Swiss"]),
    ("South Africa", &["South Africa"]),
    ("Argentina", &["Argentina"]),
    ("Thailand", &["Thailand"]),
    ("Malaysia", &["Malaysia"]),
    ("Singapore", &["Singapore"]),
    ("Saudi Arabia", &["Saudi Arabia"]),
];

static COUNTRY_LOOKUP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    COUNTRY_ALIASES
        .iter()
        .flat_map(|(country, aliases)| aliases.iter().map(move |alias| (*alias, *country)))
        .collect()
});

static COUNTRY_REGEX: Lazy<Regex> = Lazy::new(|| {
    let mut aliases: Vec<&str> = COUNTRY_LOOKUP.keys().copied().collect();
    // Longest first so "South Korea" wins over "Korea"
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let pattern = aliases
        .iter()
        .map(|alias| {
            let word_start = alias.chars().next().is_some_and(char::is_alphanumeric);
            let word_end = alias.chars().last().is_some_and(char::is_alphanumeric);
            format!(
                "{}{}{}",
                if word_start { r"\b" } else { "" },
                regex::escape(alias),
                if word_end { r"\b" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).unwrap()
});

/// 贸易双方
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeParties {
    pub exporter: Option<String>,
    pub importer: Option<String>,
}

/// 判断文本是否与关税相关
///
/// 大小写不敏感；包含任一关税关键词，或同时包含 `rate` 与 `%`/`percent` 时返回true
pub fn contains_tariff_keywords(text: &str) -> bool {
    let lower = text.to_lowercase();
    if TARIFF_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return true;
    }
    lower.contains("rate") && (lower.contains('%') || lower.contains("percent"))
}

/// 提取第一个百分比数值
///
/// `"Tariff rate: 12.5%"` 返回 `Some(12.5)`
pub fn extract_rate(text: &str) -> Option<f64> {
    RATE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

/// 提取文档年份
///
/// 先查找紧跟上下文提示词（published、updated、effective、dated、as of、©、copyright）
/// 的 20xx 年份；找不到时退回到文本中第一个独立的 2020-2029 年份。
pub fn extract_year_from_text(text: &str) -> Option<i32> {
    let contextual = CONTEXT_YEAR_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1));
    let year = contextual.or_else(|| {
        FALLBACK_YEAR_REGEX
            .captures(text)
            .and_then(|caps| caps.get(1))
    })?;
    year.as_str().parse().ok()
}

/// 将所有连续空白折叠为单个空格并去除首尾空白
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_REGEX.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// 按原文顺序选出通过相关性过滤的句子
pub fn relevant_passages(text: &str, limit: usize, max_chars: usize) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|sentence| contains_tariff_keywords(sentence))
        .take(limit)
        .map(|sentence| truncate_chars(sentence, max_chars))
        .collect()
}

fn country_mentions(text: &str) -> impl Iterator<Item = (&'static str, usize)> + '_ {
    COUNTRY_REGEX.find_iter(text).filter_map(|m| {
        COUNTRY_LOOKUP
            .get(m.as_str())
            .copied()
            .map(|country| (country, m.start()))
    })
}

fn follows_from_cue(text: &str, at: usize) -> bool {
    let prefix = text[..at].trim_end();
    let Some(cue_start) = prefix.len().checked_sub(4) else {
        return false;
    };
    prefix.is_char_boundary(cue_start)
        && prefix[cue_start..].eq_ignore_ascii_case("from")
        && !prefix[..cue_start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric)
}

/// 按出现顺序返回去重后的国家名称
pub fn extract_countries(text: &str) -> Vec<&'static str> {
    let mut countries: Vec<&'static str> = Vec::new();
    for (country, _) in country_mentions(text) {
        if !countries.contains(&country) {
            countries.push(country);
        }
    }
    countries
}

/// 识别出口国与进口国
///
/// 紧跟在 `from` 之后的国家视为出口国，其余第一个国家视为进口国；
/// 没有 `from` 提示时按出现顺序取进口国、出口国。
pub fn extract_trade_parties(text: &str) -> TradeParties {
    let exporter = country_mentions(text)
        .find(|(_, start)| follows_from_cue(text, *start))
        .map(|(country, _)| country);

    let countries = extract_countries(text);
    match exporter {
        Some(exporter) => TradeParties {
            exporter: Some(exporter.to_string()),
            importer: countries
                .into_iter()
                .find(|country| *country != exporter)
                .map(str::to_string),
        },
        None => TradeParties {
            importer: countries.first().map(|c| c.to_string()),
            exporter: countries.get(1).map(|c| c.to_string()),
        },
    }
}

/// 提取关税针对的产品（`tariffs on <product>`）
pub fn extract_product(text: &str) -> Option<String> {
    PRODUCT_REGEX.captures_iter(text).find_map(|caps| {
        let product = caps.get(1)?.as_str().trim().trim_end_matches('-').trim();
        let len = product.chars().count();
        if (3..=40).contains(&len) {
            Some(product.to_string())
        } else {
            None
        }
    })
}
