// src/upstream/newsapi.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;

use crate::config::{Settings, UpstreamEndpoint};
use crate::error::FetchError;
use crate::upstream::types::{HeadlinesQuery, HeadlinesSource, RawResponse};

const USER_AGENT: &str = "news-aggregator/0.1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// NewsAPI `top-headlines` client (also works against a proxy exposing the
/// same query contract).
#[derive(Clone)]
pub struct NewsApiClient {
    endpoint: UpstreamEndpoint,
    http: Client,
}

impl NewsApiClient {
    pub fn new(endpoint: UpstreamEndpoint, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self { endpoint, http })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(settings.endpoint.clone(), settings.timeout)
    }

    pub fn endpoint(&self) -> &UpstreamEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl HeadlinesSource for NewsApiClient {
    async fn fetch_headlines(&self, q: HeadlinesQuery<'_>) -> Result<RawResponse, FetchError> {
        let credential = q.credential.ok_or(FetchError::MissingCredential)?;
        if credential.is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let mut url = self.endpoint.url().clone();
        url.query_pairs_mut()
            .append_pair("apiKey", credential.expose())
            .append_pair("page", &q.page.to_string())
            .append_pair("pageSize", &q.page_size.to_string())
            .append_pair("country", q.country);

        tracing::info!(
            url = %credential.redact_url(&url),
            key_len = credential.len(),
            "fetching headlines"
        );
        counter!("news_upstream_requests_total").increment(1);
        let t0 = Instant::now();

        let result = async {
            let resp = self.http.get(url).send().await?;
            let status = resp.status();
            let body = resp.text().await?;
            Ok::<_, FetchError>((status, body))
        }
        .await;
        histogram!("news_upstream_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let (status, body) = result.inspect_err(|e| {
            tracing::warn!(error = %e, provider = self.name(), "upstream transport error");
            counter!("news_upstream_errors_total", "kind" => "transport").increment(1);
        })?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                provider = self.name(),
                "upstream returned error status"
            );
            counter!("news_upstream_errors_total", "kind" => "status").increment(1);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: credential.redact(&body),
            });
        }

        let raw: RawResponse = serde_json::from_str(&body).map_err(|e| {
            counter!("news_upstream_errors_total", "kind" => "decode").increment(1);
            FetchError::Transport(format!("malformed provider response: {e}"))
        })?;

        // NewsAPI may report failures in-band with a 2xx.
        if raw.status.eq_ignore_ascii_case("error") {
            counter!("news_upstream_errors_total", "kind" => "status").increment(1);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: credential.redact(&body),
            });
        }

        tracing::debug!(
            total_results = raw.total_results,
            articles = raw.articles.len(),
            "upstream ok"
        );
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NewsApiClient {
        let endpoint =
            UpstreamEndpoint::parse(&format!("{}/v2/top-headlines", server.uri())).unwrap();
        NewsApiClient::new(endpoint, Duration::from_secs(2)).unwrap()
    }

    fn query<'a>(cred: Option<&'a Credential>) -> HeadlinesQuery<'a> {
        HeadlinesQuery {
            page: 2,
            page_size: 9,
            country: "us",
            credential: cred,
        }
    }

    #[tokio::test]
    async fn missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.fetch_headlines(query(None)).await.unwrap_err();
        assert_eq!(err, FetchError::MissingCredential);
    }

    #[tokio::test]
    async fn sends_pagination_params_and_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("apiKey", "k-123"))
            .and(query_param("page", "2"))
            .and(query_param("pageSize", "9"))
            .and(query_param("country", "us"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 21,
                "articles": [{ "title": "a", "url": "https://news.example/a" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cred = Credential::new("k-123").unwrap();
        let raw = client_for(&server)
            .await
            .fetch_headlines(query(Some(&cred)))
            .await
            .unwrap();
        assert_eq!(raw.status, "ok");
        assert_eq!(raw.total_results, 21);
        assert_eq!(raw.articles.len(), 1);
    }

    #[tokio::test]
    async fn non_2xx_is_upstream_error_with_redacted_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"message\":\"bad key k-123\"}"),
            )
            .mount(&server)
            .await;

        let cred = Credential::new("k-123").unwrap();
        let err = client_for(&server)
            .await
            .fetch_headlines(query(Some(&cred)))
            .await
            .unwrap_err();
        match err {
            FetchError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key ***"));
                assert!(!body.contains("k-123"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn in_band_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "code": "rateLimited"
            })))
            .mount(&server)
            .await;

        let cred = Credential::new("k").unwrap();
        let err = client_for(&server)
            .await
            .fetch_headlines(query(Some(&cred)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: 200, .. }));
    }

    #[tokio::test]
    async fn reserved_characters_in_key_are_encoded_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apiKey", "ab+c/d="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 0,
                "articles": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cred = Credential::new("ab+c/d=").unwrap();
        let raw = client_for(&server)
            .await
            .fetch_headlines(query(Some(&cred)))
            .await
            .unwrap();
        assert!(raw.articles.is_empty());
    }

    #[tokio::test]
    async fn slow_upstream_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let endpoint = UpstreamEndpoint::parse(&server.uri()).unwrap();
        let client = NewsApiClient::new(endpoint, Duration::from_millis(200)).unwrap();
        let cred = Credential::new("secret-key").unwrap();
        let err = client
            .fetch_headlines(query(Some(&cred)))
            .await
            .unwrap_err();
        match err {
            FetchError::Transport(msg) => assert!(!msg.contains("secret-key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
