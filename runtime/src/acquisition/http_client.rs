//! Async HTTP client wrapping reqwest.
//!
//! Plain HTTP, no browser. GETs retry on 5xx and back off on 429.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::renderer::chromium::DESKTOP_USER_AGENT;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON, failing on non-2xx statuses.
    pub fn json(&self) -> Result<serde_json::Value> {
        if !(200..300).contains(&self.status) {
            anyhow::bail!("{} returned HTTP {}", self.url, self.status);
        }
        serde_json::from_str(&self.body)
            .with_context(|| format!("invalid JSON from {}", self.url))
    }
}

/// Shared HTTP client for the pipelines and API clients.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with a desktop Chrome user-agent.
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(DESKTOP_USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            timeout: Duration::from_millis(timeout_ms),
            max_retries: 2,
        }
    }

    /// Override the number of retries for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The underlying reqwest client, for callers building their own requests.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Perform a GET request with extra headers, retrying on 5xx and
    /// backing off on 429.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut retries = 0u32;

        loop {
            let mut builder = self.client.get(url).timeout(self.timeout);
            for (name, value) in headers {
                builder = builder.header(*name, *value);
            }

            match builder.send().await {
                Ok(r) => {
                    let status = r.status().as_u16();

                    // Retry on 5xx
                    if status >= 500 && retries < self.max_retries {
                        retries += 1;
                        tracing::debug!(url, status, retries, "retrying after server error");
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }

                    // Backoff on 429
                    if status == 429 && retries < self.max_retries {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        tokio::time::sleep(Duration::from_secs(retry_after.min(10))).await;
                        continue;
                    }

                    let body = r.text().await.unwrap_or_default();

                    return Ok(HttpResponse {
                        url: url.to_string(),
                        status,
                        body,
                    });
                }
                Err(e) => {
                    if retries < self.max_retries {
                        retries += 1;
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(attempt.saturating_sub(1)))
}
