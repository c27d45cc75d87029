// src/error.rs
//! Failure taxonomy for one headlines fetch.
//!
//! `MissingCredential`, `Upstream` and `Transport` are recovered by the
//! aggregator (fallback content); only `InvalidInput` reaches the caller.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No API key configured under any of the accepted env names.
    #[error("headlines credential is not configured")]
    MissingCredential,

    /// Provider answered with a non-2xx status (or an explicit error payload).
    /// `body` is the provider's response text, forwarded verbatim.
    #[error("upstream request failed with status {status}")]
    Upstream { status: u16, body: String },

    /// Timeout, connection failure, or an undecodable response body.
    /// The message never carries the request URL.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-positive page or page size.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl FetchError {
    /// Whether the aggregator may degrade to fallback content for this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FetchError::InvalidInput(_))
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::MissingCredential => "missing_credential",
            FetchError::Upstream { .. } => "upstream",
            FetchError::Transport(_) => "transport",
            FetchError::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the apiKey query parameter; never keep it.
        let timed_out = e.is_timeout();
        let e = e.without_url();
        if timed_out {
            FetchError::Transport(format!("request timed out: {e}"))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_unrecoverable() {
        assert!(FetchError::MissingCredential.is_recoverable());
        assert!(FetchError::Upstream {
            status: 429,
            body: "rate limited".into()
        }
        .is_recoverable());
        assert!(FetchError::Transport("reset".into()).is_recoverable());
        assert!(!FetchError::InvalidInput("page must be >= 1".into()).is_recoverable());
    }

    #[test]
    fn kinds_are_stable_labels() {
        assert_eq!(FetchError::MissingCredential.kind(), "missing_credential");
        assert_eq!(
            FetchError::Upstream {
                status: 500,
                body: String::new()
            }
            .kind(),
            "upstream"
        );
    }
}
