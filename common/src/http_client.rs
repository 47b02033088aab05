use crate::errors::AppError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// JSON GET client with a bounded per-request timeout and bounded retry
/// with exponential backoff.
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Self {
        let client = Client::builder()
            .user_agent("schedule-analyzer/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_retries,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Fetch and deserialize JSON from `url`, retrying transient failures.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T>(&self, url: &str) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Ok(value) => {
                    debug!(url = %url, attempt = attempt + 1, "Request successful");
                    return Ok(value);
                }
                Err(e) if attempt < self.max_retries => {
                    let backoff = Duration::from_millis(2_u64.pow(attempt) * 100);
                    warn!(
                        url = %url,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "Request failed, backing off before retry"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        url = %url,
                        attempts = attempt + 1,
                        error = %e,
                        "Request failed, retries exhausted"
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_once<T>(&self, url: &str) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| AppError::timeout(format!("Request to {} timed out", url)))?
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout(format!("Request to {} timed out", url))
                } else {
                    AppError::NetworkError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http(
                status.as_u16(),
                format!("{} returned {}", url, status),
            ));
        }

        let body = response.text().await.map_err(AppError::NetworkError)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(10, 2)
    }
}
