//! Headlines proxy: binary entrypoint.
//! Boots the Axum HTTP server with settings resolved once from the environment.

use news_aggregator::{api, metrics::Metrics, AppState, Settings};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs, only when NEWS_DEV_LOG=1.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWS_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_aggregator=debug,info"));

    // The runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    let settings = Settings::from_env()?;
    tracing::info!(
        endpoint = ?settings.endpoint,
        country = %settings.country,
        credential = ?settings.credential,
        "settings loaded"
    );
    if settings.credential.is_none() {
        tracing::warn!("no headlines credential configured; /feed serves placeholder news");
    }

    let state = AppState::from_settings(settings)?;
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "metrics recorder not installed"),
    }

    Ok(router.into())
}
