// src/api.rs
//! HTTP surface.
//!
//! `/news` is the proxy: it reports upstream failures as HTTP errors.
//! `/feed` goes through the aggregator and degrades to placeholder content.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::Aggregator;
use crate::article::Article;
use crate::config::{Settings, CREDENTIAL_ENV_NAMES};
use crate::error::FetchError;
use crate::normalize::normalize;
use crate::pagination::{paginate, PageRequest, PaginationInfo};
use crate::upstream::{HeadlinesQuery, HeadlinesSource, NewsApiClient};

#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    source: Arc<dyn HeadlinesSource>,
    aggregator: Arc<Aggregator>,
}

impl AppState {
    /// Wire the real NewsAPI client.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let client = NewsApiClient::from_settings(&settings)?;
        Ok(Self::with_source(settings, Arc::new(client)))
    }

    /// Wire any provider (tests, alternative upstreams).
    pub fn with_source(settings: Settings, source: Arc<dyn HeadlinesSource>) -> Self {
        let aggregator = Aggregator::from_settings(source.clone(), &settings);
        Self {
            settings: Arc::new(settings),
            source,
            aggregator: Arc::new(aggregator),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(proxy_news).fallback(method_not_allowed))
        .route("/feed", get(feed).fallback(method_not_allowed))
        .route("/debug/env", get(debug_env))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
    #[serde(rename = "pageSize")]
    page_size: Option<String>,
    country: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyResp {
    articles: Vec<Article>,
    total_results: u32,
    status: String,
    pagination: PaginationInfo,
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

async fn proxy_news(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Response {
    let req = match PageRequest::from_query(
        q.page.as_deref(),
        q.page_size.as_deref(),
        state.settings.default_page_size,
    ) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };

    let Some(credential) = state.settings.credential.as_ref() else {
        tracing::warn!("proxy called without a configured credential");
        return error_response(&FetchError::MissingCredential);
    };

    let country = q
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(state.settings.country.as_str())
        .to_ascii_lowercase();

    let query = HeadlinesQuery {
        page: req.page,
        page_size: req.page_size,
        country: &country,
        credential: Some(credential),
    };

    match state.source.fetch_headlines(query).await {
        Ok(raw) => {
            let articles = normalize(&raw.articles);
            let pagination = paginate(raw.total_results, req.page_size, req.page);
            Json(ProxyResp {
                articles,
                total_results: raw.total_results,
                status: raw.status,
                pagination,
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn feed(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Response {
    let req = match PageRequest::from_query(
        q.page.as_deref(),
        q.page_size.as_deref(),
        state.settings.default_page_size,
    ) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };

    match state.aggregator.fetch_page(req.page, req.page_size).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvReport {
    environment: String,
    credential_configured: bool,
    /// Presence only; values are never reported.
    credential_vars: BTreeMap<&'static str, bool>,
    timestamp: String,
}

async fn debug_env(State(state): State<AppState>) -> Json<EnvReport> {
    let credential_vars = CREDENTIAL_ENV_NAMES
        .iter()
        .map(|name| {
            let set = std::env::var(name).is_ok_and(|v| !v.trim().is_empty());
            (*name, set)
        })
        .collect();

    Json(EnvReport {
        environment: state.settings.environment.clone(),
        credential_configured: state.settings.credential.is_some(),
        credential_vars,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn error_response(e: &FetchError) -> Response {
    let (status, body) = match e {
        FetchError::InvalidInput(msg) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid request", "message": msg }),
        ),
        FetchError::MissingCredential => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "API key not configured",
                "hint": format!("set one of {}", CREDENTIAL_ENV_NAMES.join(", ")),
            }),
        ),
        FetchError::Upstream { status, body } => (
            upstream_status(*status),
            json!({ "error": "NewsAPI request failed", "details": body }),
        ),
        FetchError::Transport(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "message": msg }),
        ),
    };
    (status, Json(body)).into_response()
}

/// Upstream error status as served by the proxy. In-band failures arrive
/// with a 2xx and anything that is not an error status becomes 502.
fn upstream_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(s) if s.is_client_error() || s.is_server_error() => s,
        _ => StatusCode::BAD_GATEWAY,
    }
}
