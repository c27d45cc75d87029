// src/config/mod.rs
//! Runtime settings, resolved once at startup from the environment.

pub mod credential;

pub use credential::{Credential, CREDENTIAL_ENV_NAMES};

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::fallback::DEFAULT_FALLBACK_TOTAL;

// --- env defaults & names ---
pub const DEFAULT_UPSTREAM_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_COUNTRY: &str = "us";
/// Banner (1) + list (2) + grid (6).
pub const DEFAULT_PAGE_SIZE: u32 = 9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_UPSTREAM_URL: &str = "NEWS_UPSTREAM_URL";
pub const ENV_COUNTRY: &str = "NEWS_COUNTRY";
pub const ENV_PAGE_SIZE: &str = "NEWS_PAGE_SIZE";
pub const ENV_FALLBACK_TOTAL: &str = "NEWS_FALLBACK_TOTAL";
pub const ENV_TIMEOUT_SECS: &str = "NEWS_TIMEOUT_SECS";
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Base URL of the headlines provider (direct API or an intermediate proxy).
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamEndpoint(Url);

impl UpstreamEndpoint {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).with_context(|| format!("parsing upstream url '{raw}'"))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "upstream url must be http(s), got '{}'",
            url.scheme()
        );
        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl Default for UpstreamEndpoint {
    fn default() -> Self {
        // Constant, known-good literal.
        Self(Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream url"))
    }
}

impl fmt::Debug for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpstreamEndpoint({})", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: UpstreamEndpoint,
    pub credential: Option<Credential>,
    pub country: String,
    pub default_page_size: u32,
    pub fallback_total: u32,
    pub timeout: Duration,
    /// Free-form label reported by `/debug/env` ("production", "local", ...).
    pub environment: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: UpstreamEndpoint::default(),
            credential: None,
            country: DEFAULT_COUNTRY.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            fallback_total: DEFAULT_FALLBACK_TOTAL,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            environment: "unknown".to_string(),
        }
    }
}

impl Settings {
    /// Read process env. Missing credential is not an error (fallback mode).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let endpoint = match get(ENV_UPSTREAM_URL) {
            Some(raw) => UpstreamEndpoint::parse(&raw)?,
            None => defaults.endpoint,
        };

        let default_page_size = match get(ENV_PAGE_SIZE) {
            Some(raw) => parse_positive(ENV_PAGE_SIZE, &raw)?,
            None => defaults.default_page_size,
        };
        let fallback_total = match get(ENV_FALLBACK_TOTAL) {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("{ENV_FALLBACK_TOTAL} must be a non-negative integer"))?,
            None => defaults.fallback_total,
        };
        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(u64::from(parse_positive(ENV_TIMEOUT_SECS, &raw)?)),
            None => defaults.timeout,
        };

        Ok(Self {
            endpoint,
            credential: Credential::from_lookup(&lookup),
            country: get(ENV_COUNTRY)
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or(defaults.country),
            default_page_size,
            fallback_total,
            timeout,
            environment: get(ENV_APP_ENV).unwrap_or(defaults.environment),
        })
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u32> {
    let v: u32 = raw
        .parse()
        .with_context(|| format!("{name} must be a positive integer, got '{raw}'"))?;
    anyhow::ensure!(v >= 1, "{name} must be >= 1");
    Ok(v)
}
