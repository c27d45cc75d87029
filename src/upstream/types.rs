// src/upstream/types.rs
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Credential;
use crate::error::FetchError;

/// Parameters of one provider call.
#[derive(Debug, Clone, Copy)]
pub struct HeadlinesQuery<'a> {
    pub page: u32,
    pub page_size: u32,
    pub country: &'a str,
    pub credential: Option<&'a Credential>,
}

/// Provider payload before normalization. Currents-style providers send the
/// list under `news`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u32,
    #[serde(default, alias = "news", deserialize_with = "null_as_default")]
    pub articles: Vec<serde_json::Value>,
}

/// Providers send explicit `null` for empty fields.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[async_trait::async_trait]
pub trait HeadlinesSource: Send + Sync {
    async fn fetch_headlines(&self, query: HeadlinesQuery<'_>) -> Result<RawResponse, FetchError>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_decode_as_empty() {
        let raw: RawResponse =
            serde_json::from_str(r#"{"status":"ok","totalResults":null,"articles":null}"#).unwrap();
        assert_eq!(raw.status, "ok");
        assert_eq!(raw.total_results, 0);
        assert!(raw.articles.is_empty());
    }

    #[test]
    fn currents_list_is_read_from_news() {
        let raw: RawResponse =
            serde_json::from_str(r#"{"status":"ok","news":[{"title":"a"}]}"#).unwrap();
        assert_eq!(raw.articles.len(), 1);
        assert_eq!(raw.total_results, 0);
    }
}
