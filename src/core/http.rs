//! Production HTTP backend.
//!
//! Retries transient failures (network errors, 5xx, 429) with exponential
//! backoff and caps the number of requests in flight with a semaphore.

use crate::config::RawgConfig;
use crate::core::url::redact;
use crate::domain::ports::HttpBackend;
use crate::utils::error::{RawgError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

pub struct ReqwestBackend {
    client: Client,
    max_retries: u32,
    retry_base_delay: Duration,
    permits: Arc<Semaphore>,
}

impl ReqwestBackend {
    pub fn new(config: &RawgConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
        })
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    async fn fetch_with_retry(&self, url: &Url) -> Result<Response> {
        let safe_url = redact(url);
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RawgError::ConfigError {
                message: "HTTP backend has been shut down".to_string(),
            })?;

        let mut attempt = 0;
        loop {
            tracing::debug!(url = %safe_url, attempt, "GET");

            let error = match self.client.get(url.clone()).send().await {
                Ok(response) => match classify(response, &safe_url).await {
                    Ok(response) => return Ok(response),
                    Err(error) => error,
                },
                Err(e) => network_error(e),
            };

            if !error.is_retryable() || attempt >= self.max_retries {
                return Err(error);
            }

            attempt += 1;
            let delay = match &error {
                RawgError::RateLimited {
                    retry_after_secs: Some(secs),
                } => Duration::from_secs(*secs).min(MAX_RETRY_AFTER),
                _ => self.backoff(attempt),
            };
            tracing::warn!(
                url = %safe_url,
                attempt,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying after error: {}",
                error
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// reqwest errors carry the request URL, and with it the key.
fn network_error(error: reqwest::Error) -> RawgError {
    RawgError::Network(error.without_url())
}

/// Maps a response status onto the error taxonomy.
async fn classify(response: Response, safe_url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RawgError::Unauthorized {
            url: safe_url.to_string(),
        }),
        StatusCode::NOT_FOUND => Err(RawgError::NotFound {
            url: safe_url.to_string(),
        }),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            Err(RawgError::RateLimited { retry_after_secs })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(RawgError::ApiRequestFailed {
                status: status.as_u16(),
                url: safe_url.to_string(),
                message: error_detail(&body),
            })
        }
    }
}

/// RAWG error bodies look like `{"detail": "..."}` or `{"error": "..."}`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> Result<T> {
        let response = self.fetch_with_retry(url).await?;
        let bytes = response.bytes().await.map_err(network_error)?;
        serde_json::from_slice(&bytes).map_err(|e| RawgError::InvalidResponse {
            message: format!("{} ({})", e, redact(url)),
        })
    }
}
