// tests/normalize_dedup.rs
use news_aggregator::normalize;
use serde_json::json;

fn provider_batch() -> Vec<serde_json::Value> {
    vec![
        json!({
            "source": { "id": "bbc-news", "name": "BBC News" },
            "author": null,
            "title": "  Storm   warning issued ",
            "description": "<p>Coastal areas brace.</p>",
            "url": "https://news.example/storm",
            "urlToImage": null,
            "publishedAt": "2024-05-01T06:00:00Z"
        }),
        json!({
            "id": "c-77",
            "title": "Chip exports rise",
            "url": "https://news.example/chips",
            "image": "https://img.example/chips.png",
            "published": "2024-05-01 07:15:00 +0000",
            "category": ["business"]
        }),
        json!({
            "title": "Storm warning issued (updated)",
            "url": "https://news.example/storm"
        }),
        json!({ "title": null }),
    ]
}

#[test]
fn duplicate_url_keeps_first_and_order() {
    let out = normalize(&provider_batch());
    let titles: Vec<_> = out.iter().map(|a| a.title()).collect();
    assert_eq!(
        titles,
        vec!["Storm warning issued", "Chip exports rise", "No title"]
    );
}

#[test]
fn renormalizing_output_is_identity() {
    let once = normalize(&provider_batch());
    let as_json: Vec<serde_json::Value> = once
        .iter()
        .map(|a| serde_json::to_value(a).expect("serialize article"))
        .collect();
    let twice = normalize(&as_json);
    assert_eq!(once, twice);
}

#[test]
fn garbage_input_never_panics() {
    let raw = vec![
        json!(null),
        json!("string"),
        json!([1, 2]),
        json!({ "url": 5, "title": 7, "urlToImage": {}, "category": "x" }),
    ];
    let out = normalize(&raw);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title(), "No title");
    assert_eq!(out[0].category(), ["x".to_string()]);
}
