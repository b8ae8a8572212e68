use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use rigquote_core::config::BackendConfig;

use crate::error::{ApiError, ApiResult};

const RETRY_BASE_DELAY_MS: u64 = 500;

/// Thin wrapper over `reqwest` that owns the base URL, the per-request
/// timeout and the retry budget for idempotent reads.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    base_url: String,
    max_retries: u32,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApiError::Unexpected(format!("could not build http client: {error}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.max(1),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Idempotent read with a bounded retry budget and exponential backoff.
    /// Non-transient failures (4xx, malformed bodies) surface immediately.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        let url = self.url(path);
        let mut attempt = 1u32;

        loop {
            debug!(correlation_id = %correlation_id, url = %url, attempt, "GET");
            let outcome = match self.client.get(&url).send().await {
                Ok(response) => decode_json(response, path).await,
                Err(error) => Err(ApiError::from(error)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << (attempt - 1));
                    warn!(
                        correlation_id = %correlation_id,
                        url = %url,
                        attempt,
                        error = %error,
                        "transient failure, retrying GET"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Writes go out exactly once: a duplicated quotation is worse than a
    /// surfaced error, so there is no retry here.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        let url = self.url(path);
        debug!(correlation_id = %correlation_id, url = %url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        decode_json(response, path).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        let url = self.url(path);
        debug!(correlation_id = %correlation_id, url = %url, "PUT");

        let response = self.client.put(&url).json(body).send().await?;
        decode_json(response, path).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path);
        debug!(url = %url, "DELETE");

        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::from_status(status, path))
        }
    }

    /// Liveness probe: success status only, body ignored, never retried.
    pub async fn probe(&self, path: &str) -> bool {
        match self.client.get(self.url(path)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Decode a JSON response, treating a non-JSON 200 (an HTML error page from
/// a misbehaving proxy, say) as an error rather than parsing it blind.
async fn decode_json<T: DeserializeOwned>(response: Response, context: &str) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_status(status, context));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("application/json") {
        return Err(ApiError::Unexpected(format!(
            "{context}: expected application/json, got `{content_type}`"
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::Unexpected(format!("{context}: malformed json body: {error}")))
}
