// src/fallback.rs
//! Deterministic placeholder headlines served when the provider is
//! unreachable or unconfigured.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::article::{Article, PageResult};
use crate::pagination::paginate;

/// Size of the synthetic catalog (six pages of eleven).
pub const DEFAULT_FALLBACK_TOTAL: u32 = 66;

pub const FALLBACK_AUTHOR: &str = "Demo Reporter";

struct Template {
    title: &'static str,
    description: &'static str,
    category: &'static [&'static str],
}

const TEMPLATES: [Template; 9] = [
    Template {
        title: "Breaking: Revolutionary AI Technology Transforms Healthcare Industry",
        description: "New artificial intelligence system helps doctors diagnose diseases with high accuracy.",
        category: &["Technology", "Healthcare"],
    },
    Template {
        title: "Climate Change: Scientists Announce Major Breakthrough in Carbon Capture",
        description: "Researchers develop new method that can remove CO2 from atmosphere efficiently.",
        category: &["Environment", "Science"],
    },
    Template {
        title: "Space Exploration: Mars Mission Discovers Evidence of Ancient Water Systems",
        description: "Rovers find compelling evidence of massive underground water networks.",
        category: &["Space", "Science"],
    },
    Template {
        title: "Economic Update: Global Markets Show Strong Recovery Signals",
        description: "International financial experts report positive trends across major economies.",
        category: &["Business", "Economy"],
    },
    Template {
        title: "Sports: Championship Finals Set to Break Viewership Records",
        description: "Unprecedented global interest in this year's championship expected.",
        category: &["Sports"],
    },
    Template {
        title: "Technology: Quantum Computing Achieves New Milestone",
        description: "Scientists successfully demonstrate quantum supremacy in complex calculations.",
        category: &["Technology", "Science"],
    },
    Template {
        title: "Health: New Treatment Shows Promise for Rare Genetic Disorders",
        description: "Clinical trials reveal groundbreaking gene therapy technique.",
        category: &["Health", "Medical"],
    },
    Template {
        title: "Education: Digital Learning Platforms Report Record Enrollment",
        description: "Online education continues to grow as institutions adapt.",
        category: &["Education", "Technology"],
    },
    Template {
        title: "Entertainment: Streaming Services Invest Billions in Original Content",
        description: "Major platforms announce unprecedented spending on exclusive shows.",
        category: &["Entertainment", "Media"],
    },
];

/// Placeholder page using the current time as the newest timestamp.
pub fn generate_fallback(page: u32, page_size: u32, total: u32) -> PageResult {
    generate_fallback_at(Utc::now(), page, page_size, total)
}

/// Same as [`generate_fallback`] with an injected clock. Catalog item `i` is
/// stamped `now - i hours`, so timestamps strictly descend through the catalog.
pub fn generate_fallback_at(
    now: DateTime<Utc>,
    page: u32,
    page_size: u32,
    total: u32,
) -> PageResult {
    let page_size = page_size.max(1);
    let start = (page.max(1) as u64 - 1) * page_size as u64;
    let end = (start + page_size as u64).min(total as u64);

    let articles = (start..end)
        .map(|i| catalog_item(now, i as usize, page_size as usize))
        .collect();

    PageResult {
        articles,
        pagination: paginate(total, page_size, page),
    }
}

fn catalog_item(now: DateTime<Utc>, i: usize, page_size: usize) -> Article {
    let tpl = &TEMPLATES[i % TEMPLATES.len()];
    let n = i + 1;
    let published = now - Duration::hours(i as i64);

    Article {
        id: n.to_string(),
        title: format!("Page {}: {}", i / page_size + 1, tpl.title),
        description: Some(tpl.description.to_string()),
        // Unique per item so identity keys never collide.
        url: format!("#demo-{n}"),
        image_url: Some(format!("https://picsum.photos/400/300?random={n}")),
        author: Some(FALLBACK_AUTHOR.to_string()),
        published_at: Some(published.to_rfc3339_opts(SecondsFormat::Secs, true)),
        source: None,
        category: tpl.category.iter().map(|c| c.to_string()).collect(),
    }
}
