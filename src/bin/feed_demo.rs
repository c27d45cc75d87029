//! Runs one aggregator cycle against the configured provider (or placeholder
//! content when no key is set) and prints the page.
//!
//! Usage: `cargo run --bin feed_demo -- [page] [page_size]`

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use news_aggregator::time_ago::published_ago;
use news_aggregator::{Aggregator, FeedView, NewsApiClient, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let page: u32 = match args.next() {
        Some(p) => p.parse().context("page must be a positive integer")?,
        None => 1,
    };

    let settings = Settings::from_env()?;
    let page_size: u32 = match args.next() {
        Some(s) => s.parse().context("page_size must be a positive integer")?,
        None => settings.default_page_size,
    };

    let client = NewsApiClient::from_settings(&settings)?;
    let aggregator = Aggregator::from_settings(Arc::new(client), &settings);
    let view = FeedView::new(page_size);

    view.load_page(&aggregator, page).await?;
    let Some(result) = view.snapshot() else {
        anyhow::bail!("no page result applied");
    };

    let now = Utc::now();
    let p = &result.pagination;
    println!(
        "page {}/{} ({} results, {} per page)",
        p.current_page, p.total_pages, p.total_results, p.page_size
    );
    for a in &result.articles {
        let when = a
            .published_at()
            .and_then(|ts| published_ago(ts, now))
            .unwrap_or_else(|| "-".to_string());
        println!("  [{when}] {}", a.title());
        println!("      {}", a.url());
    }
    println!(
        "prev: {:?}  next: {:?}",
        p.prev_page(),
        p.next_page()
    );
    Ok(())
}
