// src/normalize.rs
//! Provider record -> canonical `Article` mapping, plus deduplication.
//!
//! Accepts NewsAPI (`urlToImage`, `publishedAt`, `source.name`), Currents
//! (`image`, `published`, `category`) and our own serialized output
//! (`imageUrl`, `source` string), so normalizing twice is a no-op.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::{Map, Value};

use crate::article::Article;

/// Heading used when a provider record has no usable title.
pub const TITLE_PLACEHOLDER: &str = "No title";

const IMAGE_KEYS: [&str; 3] = ["imageUrl", "urlToImage", "image"];

/// Currents-style timestamp, e.g. `2024-05-01 08:30:00 +0000`.
const CURRENTS_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Strip HTML tags, collapse whitespace, trim.
pub fn clean_text(s: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"<[^<>]+>").expect("tag regex"));
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));

    // Removing one tag can expose another (`<<b>i>`); strip until stable.
    let mut out = s.to_string();
    while re_tags.is_match(&out) {
        out = re_tags.replace_all(&out, "").into_owned();
    }
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Map raw provider records to canonical articles, keeping the first
/// occurrence per identity key. Non-object records are skipped.
pub fn normalize(raw: &[Value]) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for (idx, rec) in raw.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            tracing::debug!(position = idx, "skipping non-object article record");
            continue;
        };
        let article = normalize_one(idx, obj);
        if !seen.insert(article.identity_key().to_string()) {
            tracing::debug!(key = article.identity_key(), "dropping duplicate article");
            continue;
        }
        out.push(article);
    }

    out
}

fn normalize_one(idx: usize, obj: &Map<String, Value>) -> Article {
    let url = str_field(obj, "url").unwrap_or_default();

    let id = id_field(obj)
        .or_else(|| (!url.is_empty()).then(|| url.clone()))
        .unwrap_or_else(|| format!("article-{}", idx + 1));

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(clean_text)
        .filter(|d| !d.is_empty());

    let image_url = IMAGE_KEYS.iter().find_map(|k| str_field(obj, k));

    let published_at = str_field(obj, "publishedAt")
        .or_else(|| str_field(obj, "published").map(|p| currents_to_rfc3339(&p)));

    Article {
        id,
        title,
        description,
        url,
        image_url,
        author: str_field(obj, "author")
            .map(|a| clean_text(&a))
            .filter(|a| !a.is_empty()),
        published_at,
        source: source_name(obj),
        category: categories(obj),
    }
}

/// Trimmed, non-empty string value.
fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn source_name(obj: &Map<String, Value>) -> Option<String> {
    let name = match obj.get("source")? {
        Value::String(s) => s.as_str(),
        Value::Object(o) => o.get("name").and_then(Value::as_str)?,
        _ => return None,
    };
    Some(clean_text(name)).filter(|s| !s.is_empty())
}

fn categories(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("category") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Unparseable values are kept as-is.
fn currents_to_rfc3339(raw: &str) -> String {
    DateTime::parse_from_str(raw, CURRENTS_TS_FORMAT)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_text_strips_tags_and_whitespace() {
        assert_eq!(clean_text("  <b>Hello</b>\n\t world  "), "Hello world");
        assert_eq!(clean_text("<<b>i>x"), "x");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn newsapi_record_maps_to_canonical_fields() {
        let raw = vec![json!({
            "source": { "id": null, "name": "Reuters" },
            "author": "Jane Roe",
            "title": "Markets rally",
            "description": "Stocks <i>up</i>.",
            "url": "https://news.example/a",
            "urlToImage": "https://img.example/a.jpg",
            "publishedAt": "2024-05-01T08:30:00Z"
        })];
        let out = normalize(&raw);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.id(), "https://news.example/a");
        assert_eq!(a.title(), "Markets rally");
        assert_eq!(a.description(), Some("Stocks up."));
        assert_eq!(a.image_url(), Some("https://img.example/a.jpg"));
        assert_eq!(a.author(), Some("Jane Roe"));
        assert_eq!(a.published_at(), Some("2024-05-01T08:30:00Z"));
        assert_eq!(a.source(), Some("Reuters"));
    }

    #[test]
    fn currents_record_maps_image_and_timestamp() {
        let raw = vec![json!({
            "id": "c-1",
            "title": "Quantum milestone",
            "url": "https://news.example/q",
            "image": "https://img.example/q.png",
            "published": "2024-05-01 08:30:00 +0000",
            "category": ["technology", " science "]
        })];
        let a = &normalize(&raw)[0];
        assert_eq!(a.id(), "c-1");
        assert_eq!(a.image_url(), Some("https://img.example/q.png"));
        assert_eq!(a.published_at(), Some("2024-05-01T08:30:00Z"));
        assert_eq!(a.category(), ["technology".to_string(), "science".to_string()]);
    }

    #[test]
    fn missing_title_gets_placeholder() {
        let raw = vec![
            json!({ "url": "https://news.example/1" }),
            json!({ "url": "https://news.example/2", "title": "   " }),
        ];
        let out = normalize(&raw);
        assert!(out.iter().all(|a| a.title() == TITLE_PLACEHOLDER));
    }

    #[test]
    fn dedup_keeps_first_by_url_then_id() {
        let raw = vec![
            json!({ "id": 1, "title": "first", "url": "https://news.example/x" }),
            json!({ "id": 2, "title": "other", "url": "https://news.example/y" }),
            json!({ "id": 3, "title": "second", "url": "https://news.example/x" }),
            json!({ "id": "z", "title": "no url" }),
            json!({ "id": "z", "title": "no url again" }),
        ];
        let out = normalize(&raw);
        let titles: Vec<_> = out.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["first", "other", "no url"]);
    }

    #[test]
    fn records_without_id_or_url_stay_distinct() {
        let raw = vec![json!({ "title": "a" }), json!({ "title": "b" }), json!(42)];
        let out = normalize(&raw);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id(), "article-1");
        assert_eq!(out[1].id(), "article-2");
    }
}
