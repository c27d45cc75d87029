// src/aggregator.rs
//! # Aggregator
//! One request/response cycle: fetch -> normalize -> paginate, degrading to
//! placeholder content instead of failing.
//!
//! States: `Idle -> Fetching -> {Success, Fallback, Error}`. An empty page past
//! the first triggers a single corrective re-fetch of the last page that
//! still has data; a second empty result settles in `Fallback`.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;

use crate::article::PageResult;
use crate::config::{Credential, Settings};
use crate::error::FetchError;
use crate::fallback::{generate_fallback, DEFAULT_FALLBACK_TOTAL};
use crate::metrics::ensure_metrics_described;
use crate::normalize::normalize;
use crate::pagination::{paginate, PageRequest};
use crate::upstream::{HeadlinesQuery, HeadlinesSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    MissingCredential,
    UpstreamFailed,
    /// Real data ran out even after the corrective retry.
    RanPastEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    Idle,
    Fetching { page: u32, retried: bool },
    Success,
    Fallback(FallbackReason),
    Error,
}

/// Terminal state plus diagnostics. Callers that only render use
/// [`Aggregator::fetch_page`]; the result shape is identical either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: PageResult,
    pub state: AggregatorState,
    /// Upstream calls made (1, or 2 after a corrective retry).
    pub attempts: u32,
}

pub struct Aggregator {
    source: Arc<dyn HeadlinesSource>,
    credential: Option<Credential>,
    country: String,
    fallback_total: u32,
}

impl Aggregator {
    pub fn new(
        source: Arc<dyn HeadlinesSource>,
        credential: Option<Credential>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            source,
            credential,
            country: country.into(),
            fallback_total: DEFAULT_FALLBACK_TOTAL,
        }
    }

    pub fn from_settings(source: Arc<dyn HeadlinesSource>, settings: &Settings) -> Self {
        Self::new(source, settings.credential.clone(), settings.country.clone())
            .with_fallback_total(settings.fallback_total)
    }

    pub fn with_fallback_total(mut self, total: u32) -> Self {
        self.fallback_total = total;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PageResult, FetchError> {
        self.run(page, page_size).await.map(|o| o.result)
    }

    pub async fn run(&self, page: u32, page_size: u32) -> Result<Outcome, FetchError> {
        ensure_metrics_described();
        let mut state = AggregatorState::Idle;

        let req = match PageRequest::new(page, page_size) {
            Ok(r) => r,
            Err(e) => {
                transition(&mut state, AggregatorState::Error);
                return Err(e);
            }
        };

        let mut target = req.page;
        let mut retried = false;
        let mut attempts = 0u32;

        loop {
            transition(
                &mut state,
                AggregatorState::Fetching {
                    page: target,
                    retried,
                },
            );
            attempts += 1;

            let query = HeadlinesQuery {
                page: target,
                page_size: req.page_size,
                country: &self.country,
                credential: self.credential.as_ref(),
            };

            let raw = match self.source.fetch_headlines(query).await {
                Ok(raw) => raw,
                Err(e) if e.is_recoverable() => {
                    let reason = match e {
                        FetchError::MissingCredential => FallbackReason::MissingCredential,
                        _ => FallbackReason::UpstreamFailed,
                    };
                    tracing::warn!(
                        error = %e,
                        kind = e.kind(),
                        provider = self.source.name(),
                        "serving fallback headlines"
                    );
                    return Ok(self.fallback(&mut state, reason, target, req.page_size, attempts));
                }
                Err(e) => {
                    transition(&mut state, AggregatorState::Error);
                    return Err(e);
                }
            };

            let articles = normalize(&raw.articles);

            if articles.is_empty() && target > 1 {
                if retried {
                    return Ok(self.fallback(
                        &mut state,
                        FallbackReason::RanPastEnd,
                        target,
                        req.page_size,
                        attempts,
                    ));
                }
                let max_page_with_data = paginate(raw.total_results, req.page_size, 1).total_pages;
                let corrected = (target - 1).min(max_page_with_data).max(1);
                tracing::info!(
                    requested = target,
                    corrected,
                    total_results = raw.total_results,
                    "empty page past the end; retrying once"
                );
                counter!("news_corrective_retry_total").increment(1);
                target = corrected;
                retried = true;
                continue;
            }

            // Some providers under-report totals; never paginate below what we hold.
            let held = (target as usize - 1) * req.page_size as usize + articles.len();
            let total = raw
                .total_results
                .max(u32::try_from(held).unwrap_or(u32::MAX));

            transition(&mut state, AggregatorState::Success);
            return Ok(Outcome {
                result: PageResult {
                    articles,
                    pagination: paginate(total, req.page_size, target),
                },
                state,
                attempts,
            });
        }
    }

    fn fallback(
        &self,
        state: &mut AggregatorState,
        reason: FallbackReason,
        page: u32,
        page_size: u32,
        attempts: u32,
    ) -> Outcome {
        counter!("news_fallback_total", "reason" => reason_label(reason)).increment(1);
        transition(state, AggregatorState::Fallback(reason));
        Outcome {
            result: generate_fallback(page, page_size, self.fallback_total),
            state: *state,
            attempts,
        }
    }
}

fn reason_label(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::MissingCredential => "missing_credential",
        FallbackReason::UpstreamFailed => "upstream_failed",
        FallbackReason::RanPastEnd => "ran_past_end",
    }
}

fn transition(state: &mut AggregatorState, next: AggregatorState) {
    tracing::debug!(from = ?*state, to = ?next, "aggregator transition");
    *state = next;
}
