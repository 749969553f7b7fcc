// src/http.rs
// =============================================================================
// Thin HTTP layer shared by every provider.
//
// - HeaderProvider: where GitHub auth headers come from (swappable)
// - TokenHeaders: the default HeaderProvider, built from GITHUB_TOKEN
// - Fetcher: one reqwest Client plus the header provider
//
// Every call here is awaited by the caller before the next one starts, so
// requests always go out one at a time, in program order.
// =============================================================================

use crate::config::Config;
use crate::error::{ResolveError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Supplies the headers attached to authenticated GitHub requests.
pub trait HeaderProvider: Send + Sync {
    fn github_headers(&self) -> HeaderMap;
}

/// Headers from an optional personal access token.
#[derive(Debug, Clone, Default)]
pub struct TokenHeaders {
    token: Option<String>,
}

impl TokenHeaders {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.github_token.clone())
    }
}

impl HeaderProvider for TokenHeaders {
    fn github_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("token {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("GitHub token contains invalid header characters, sending unauthenticated"),
            }
        }

        headers
    }
}

/// Status and body of a response we did not want to turn into an error.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // The body as JSON when it parses, otherwise as a JSON string
    pub fn body_value(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    headers: Arc<dyn HeaderProvider>,
}

impl Fetcher {
    // Creates a fetcher from configuration
    //
    // No default timeout: a hung upstream hangs the resolution unless
    // Config::timeout is set.
    pub fn new(config: &Config, headers: Arc<dyn HeaderProvider>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            headers,
        })
    }

    pub fn github_headers(&self) -> HeaderMap {
        self.headers.github_headers()
    }

    // GET, fail on a non-success status, decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, headers: HeaderMap) -> Result<T> {
        let raw = self.get_raw(url, headers, &[]).await?;
        if !raw.is_success() {
            return Err(ResolveError::UpstreamStatus {
                url: url.to_string(),
                status: raw.status,
            });
        }
        Ok(serde_json::from_str(&raw.body)?)
    }

    // GET, fail on a non-success status, return the body as plain text
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let raw = self.get_raw(url, headers, &[]).await?;
        if !raw.is_success() {
            return Err(ResolveError::UpstreamStatus {
                url: url.to_string(),
                status: raw.status,
            });
        }
        Ok(raw.body)
    }

    // GET that hands back whatever came back, success or not
    //
    // Only transport failures (DNS, connection reset, ...) are errors here.
    pub async fn get_raw(
        &self,
        url: &str,
        headers: HeaderMap,
        query: &[(&str, &str)],
    ) -> Result<RawResponse> {
        debug!(url, "GET");

        let mut request = self.client.get(url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(url, status, bytes = body.len(), "response");
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(&Config::default(), Arc::new(TokenHeaders::default())).unwrap()
    }

    #[test]
    fn test_token_headers_without_token() {
        let headers = TokenHeaders::new(None).github_headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), GITHUB_ACCEPT);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_headers_with_token() {
        let headers = TokenHeaders::new(Some("abc123".to_string())).github_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "token abc123");
    }

    #[test]
    fn test_raw_response_body_value() {
        let json = RawResponse { status: 404, body: r#"{"message":"Not Found"}"#.to_string() };
        assert_eq!(json.body_value()["message"], "Not Found");
        assert!(!json.is_success());

        let text = RawResponse { status: 502, body: "bad gateway".to_string() };
        assert_eq!(text.body_value(), Value::String("bad gateway".to_string()));
    }

    #[tokio::test]
    async fn test_get_json_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/thing")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let url = format!("{}/thing", server.url());
        let result: Result<Value> = fetcher().get_json(&url, HeaderMap::new()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ResolveError::UpstreamStatus { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_get_raw_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/contents/")
            .match_query(mockito::Matcher::UrlEncoded("ref".into(), "v1.0".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let url = format!("{}/contents/", server.url());
        let raw = fetcher().get_raw(&url, HeaderMap::new(), &[("ref", "v1.0")]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, "[]");
    }
}
