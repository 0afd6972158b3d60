// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! HTML 文本处理
//!
//! 把抓取到的页面转换为纯文本，并读取标题与发布日期元数据

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::domain::services::content_extractor::clean_text;

static HTML_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:!doctype|html|head|body|p|div|article|span|title|h1)[\s>/]").unwrap()
});

/// 不参与正文提取的元素
const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "head", "svg"];

/// 发布日期元数据的查找顺序
const PUBLISH_DATE_SELECTORS: [(&str, &str); 8] = [
    (r#"meta[property="article:published_time"]"#, "content"),
    (r#"meta[property="og:published_time"]"#, "content"),
    (r#"meta[name="pubdate"]"#, "content"),
    (r#"meta[name="publishdate"]"#, "content"),
    (r#"meta[name="date"]"#, "content"),
    (r#"meta[name="dc.date"]"#, "content"),
    (r#"meta[itemprop="datePublished"]"#, "content"),
    ("time[datetime]", "datetime"),
];

/// 判断内容是否为HTML
pub fn looks_like_html(body: &str) -> bool {
    HTML_MARKER_REGEX.is_match(body)
}

/// 将HTML转换为纯文本
///
/// 非HTML内容原样返回。结果未做空白折叠，调用方需要再经过 `clean_text`。
pub fn html_to_text(body: &str) -> String {
    if !looks_like_html(body) {
        return body.to_string();
    }

    let document = Html::parse_document(body);
    let mut text = String::with_capacity(body.len() / 2);
    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if !skipped {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

/// 提取页面标题，`<title>` 为空时退回第一个 `<h1>`
pub fn extract_title(body: &str) -> Option<String> {
    if !looks_like_html(body) {
        return None;
    }
    let document = Html::parse_document(body);
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        let element = document.select(&selector).next()?;
        let title = clean_text(&element.text().collect::<String>());
        (!title.is_empty()).then_some(title)
    })
}

/// 提取发布日期
///
/// 能解析为 RFC 3339 或 `YYYY-MM-DD` 时规范化为 `YYYY-MM-DD`，否则返回原值
pub fn extract_publish_date(body: &str) -> Option<String> {
    if !looks_like_html(body) {
        return None;
    }
    let document = Html::parse_document(body);
    PUBLISH_DATE_SELECTORS.iter().find_map(|(css, attr)| {
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).find_map(|element| {
            let value = element.value().attr(attr)?.trim();
            (!value.is_empty()).then(|| normalize_date(value))
        })
    })
}

fn normalize_date(value: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return datetime.date_naive().format("%Y-%m-%d").to_string();
    }
    let date_part = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => value.to_string(),
    }
}
