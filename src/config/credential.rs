// src/config/credential.rs
use std::fmt;

/// Env names checked for the provider API key; first non-empty wins.
pub const CREDENTIAL_ENV_NAMES: [&str; 3] = ["NEWS_API_KEY", "NEWSAPI_KEY", "VITE_NEWS_API_KEY"];

/// Provider API key. `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Resolve from a lookup function over [`CREDENTIAL_ENV_NAMES`].
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        CREDENTIAL_ENV_NAMES
            .into_iter()
            .find_map(|name| lookup(name).and_then(Self::new))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mask(&self) -> &'static str {
        "***"
    }

    /// Short SHA-256 prefix; lets logs tell two keys apart without revealing either.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(self.0.as_bytes());
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }

    /// Replace every occurrence of the secret in `text` (URLs, error bodies).
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, self.mask())
    }

    /// Render `url` for logs: the `apiKey` pair is rebuilt as `***` (the raw
    /// secret would otherwise survive percent-encoded) and any remaining
    /// literal occurrence is masked.
    pub fn redact_url(&self, url: &reqwest::Url) -> String {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "apiKey" {
                    self.mask().to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        let mut out = url.clone();
        if !pairs.is_empty() {
            out.query_pairs_mut().clear().extend_pairs(pairs);
        }
        self.redact(out.as_str())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("len", &self.0.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mask())
    }
}
