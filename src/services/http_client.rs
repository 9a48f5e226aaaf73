use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::constants::{endpoint::API_ENDPOINT, network, retry as retry_constants};
use crate::errors::ApiError;
use crate::services::auth::AuthManager;
use crate::services::identity::ConnectionContext;
use crate::services::logger::Logger;

/// `{success, data?, error?}` wrapper returned by every API route.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T = Value> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry_constants::MAX_RETRIES,
            initial_delay_ms: retry_constants::INITIAL_DELAY_MS,
            max_delay_ms: retry_constants::MAX_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Honors a positive integer `Retry-After` (seconds), else exponential
    /// backoff from `initial_delay_ms`. Always capped at `max_delay_ms`.
    pub fn delay_ms(&self, attempt: u32, retry_after: Option<&str>) -> u64 {
        if let Some(seconds) = retry_after.and_then(parse_retry_after) {
            return seconds.saturating_mul(1_000).min(self.max_delay_ms);
        }
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }

    pub fn allows_retry(&self, err: &ApiError, attempt: u32) -> bool {
        err.is_rate_limited() && attempt < self.max_retries
    }
}

/// Leading-integer parse of a `Retry-After` value; only positive counts.
fn parse_retry_after(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().ok().filter(|seconds| *seconds > 0)
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    logger: Logger,
    auth: AuthManager,
    context: ConnectionContext,
    client: Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(
        logger: Logger,
        auth: AuthManager,
        context: ConnectionContext,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            logger: logger.child("http"),
            auth,
            context,
            client: build_client()?,
            base_url: API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(network::REQUEST_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[cfg(test)]
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Map<String, Value>,
    ) -> Result<T, ApiError> {
        let body = Value::Object(self.context.merge_into(body));
        self.execute_with_retry(Method::POST, path, Some(&body)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_with_retry(Method::GET, path, None).await
    }

    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0u32;
        loop {
            match self.send_once(method.clone(), &url, body).await {
                Ok(data) => return Ok(data),
                Err(err) if self.retry.allows_retry(&err, attempt) => {
                    let delay_ms = self.retry.delay_ms(attempt, err.retry_after());
                    self.logger.warn(
                        "Rate limited, retrying",
                        Some(&serde_json::json!({
                            "path": path,
                            "attempt": attempt + 1,
                            "delay_ms": delay_ms,
                        })),
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        self.logger.debug(
            "request",
            Some(&serde_json::json!({"method": method.as_str(), "url": url})),
        );
        let mut request = self
            .client
            .request(method, url)
            .headers(self.build_headers()?);
        if let Some(body) = body {
            // json() also sets Content-Type: application/json
            request = request.json(body);
        }

        // Dropping the future on expiry cancels the in-flight request.
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());
            let text = response.text().await;
            Ok::<_, reqwest::Error>((status, retry_after, text))
        };
        let (status, retry_after, text) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                self.logger
                    .warn("Request timed out", Some(&serde_json::json!({"url": url})));
                ApiError::timeout()
            })?
            .map_err(|err| self.map_transport_error(url, err))?;

        handle_response(status, retry_after, text.ok().as_deref())
    }

    fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth.header_value()?);
        Ok(headers)
    }

    fn map_transport_error(&self, url: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            return ApiError::timeout();
        }
        self.logger.warn(
            "Network failure",
            Some(&serde_json::json!({"url": url, "error": err.to_string()})),
        );
        ApiError::network(err)
    }
}

pub(crate) fn build_client() -> Result<Client, ApiError> {
    Client::builder()
        .user_agent(network::USER_AGENT)
        .build()
        .map_err(|err| ApiError::internal(format!("Failed to build HTTP client: {}", err), 0))
}

/// Maps one HTTP exchange onto the envelope contract. `body` is `None` when
/// the body could not be read at all.
pub(crate) fn handle_response<T: DeserializeOwned>(
    status: StatusCode,
    retry_after: Option<String>,
    body: Option<&str>,
) -> Result<T, ApiError> {
    let envelope = body.and_then(|text| serde_json::from_str::<ApiResponse<Value>>(text).ok());
    let Some(envelope) = envelope else {
        if !status.is_success() {
            return Err(ApiError::internal(
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                ),
                status.as_u16(),
            ));
        }
        return Err(ApiError::invalid_response());
    };

    let error = envelope.error.unwrap_or_default();
    if !status.is_success() {
        let message = error
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        let mut err = ApiError::remote(error.code, "UNKNOWN_ERROR", message, status.as_u16());
        if let Some(retry_after) = retry_after.filter(|v| !v.is_empty()) {
            err = err.with_retry_after(retry_after);
        }
        return Err(err);
    }

    if !envelope.success {
        let message = error
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Unknown API error".to_string());
        return Err(ApiError::remote(error.code, "API_ERROR", message, 500));
    }

    serde_json::from_value(envelope.data.unwrap_or(Value::Null))
        .map_err(|_| ApiError::invalid_response())
}
