use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_upstream_requests_total",
            "Requests sent to the headlines provider."
        );
        describe_counter!(
            "news_upstream_errors_total",
            "Provider failures by kind (transport, status, decode)."
        );
        describe_counter!(
            "news_fallback_total",
            "Pages served from placeholder content, by reason."
        );
        describe_counter!(
            "news_corrective_retry_total",
            "Re-fetches after an empty page past the end of real data."
        );
        describe_histogram!(
            "news_upstream_fetch_ms",
            "Provider round-trip time in milliseconds."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
