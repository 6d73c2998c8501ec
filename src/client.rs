//! HTTP transport for the catalog service
//!
//! Every remote call goes through [`HttpClient::request`]: bearer-token
//! auth, bounded retries with exponential backoff, and a fixed per-call
//! timeout. Status codes in [400,500) are terminal; network failures and
//! 5xx responses are retried.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response};
use serde_json::Value;

use crate::error::{Result, SyncError};

/// Maximum number of retries after the initial attempt
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff; retry i waits base * 2^i
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Wall-clock timeout for a single network exchange
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the catalog service API
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the given server; an empty token disables auth
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            token: token.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request with the default JSON content type
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        self.request_with_headers(method, path, body, &[("Content-Type", "application/json")])
            .await
    }

    /// Issue a request with explicit headers, retrying transient failures.
    ///
    /// Retries are blind to the HTTP method: POST and DELETE are retried
    /// exactly like GET, so a request that succeeded server-side but timed
    /// out on the wire may be replayed. The server deduplicates where it
    /// matters (workspace creation answers 400 for an existing name).
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 0..=MAX_RETRIES {
            let mut request = self.http.request(method.clone(), &url);

            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            if !self.token.is_empty() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", self.token));
            }

            if let Some(body) = body {
                request = request.body(serde_json::to_string(body)?);
            }

            let failure = match request.send().await {
                Ok(response) if response.status().as_u16() < 500 => {
                    // Success or a terminal client error (4xx)
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt == MAX_RETRIES {
                        let body = response.text().await.unwrap_or_default();
                        return Err(SyncError::RemoteStatus { status, body });
                    }
                    format!("status code {status}")
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(SyncError::Transport(e.to_string()));
                    }
                    e.to_string()
                }
            };

            let delay = BASE_DELAY * 2u32.pow(attempt);
            log::debug!("Request to {url} failed ({failure}), retrying in {delay:?}");
            tokio::time::sleep(delay).await;
        }

        Err(SyncError::Transport(format!("request to {url} failed after retries")))
    }
}
