use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde_json::Value;

/// Upstream base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Per-attempt request timeout (30 seconds).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retries after the initial attempt (4 attempts in total).
pub const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubled for each following one.
pub const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// A single upstream call, described independently of any HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments, e.g. `["products", "category", "men's clothing"]`.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::GET,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    /// Append `name=value` only when a value is present.
    pub fn query_opt(mut self, name: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())?;
        for (i, (name, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed with status code {status}")]
    Status { status: u16 },
    #[error("timeout of {}ms exceeded", .timeout.as_millis())]
    Timeout { timeout: Duration },
    #[error("{message}")]
    Network { message: String },
    #[error("Invalid response body: {message}")]
    Decode { message: String },
    #[error("Invalid request URL: {message}")]
    InvalidUrl { message: String },
}

impl TransportError {
    /// Upstream HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Client errors are final except 408 and 429. A body that fails to parse
    /// or a URL that cannot be built will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status } => !(400..500).contains(status) || matches!(status, 408 | 429),
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Decode { .. } | Self::InvalidUrl { .. } => false,
        }
    }
}

/// One attempt against the upstream API.
///
/// Implementations return the parsed JSON body, or `Value::Null` when the
/// upstream answered 2xx with an empty body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl {
                message: format!("{base_url} cannot be used as a base URL"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network { message: e.to_string() })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { timeout: self.timeout }
        } else {
            TransportError::Network { message: err.to_string() }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let url = self.url_for(request)?;

        let response = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), path = %request.path(), "API response");

        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::Decode { message: e.to_string() })
    }
}

/// Exponential backoff schedule: `base_delay * 2^(n-1)` before retry `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.pow(retry.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: BACKOFF_BASE,
        }
    }
}

/// Upstream client: logging plus retry with backoff around an [`HttpTransport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `request`, retrying retryable failures up to `max_retries` times.
    ///
    /// The per-attempt timeout belongs to the transport; there is no deadline
    /// across the whole retry sequence.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let mut retry = 0;

        loop {
            tracing::debug!(method = %request.method, path = %request.path(), "API request");

            match self.transport.send(request).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    tracing::warn!(
                        attempt = retry,
                        max_retries = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying request: {request}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(
                        status = ?err.status(),
                        error = %err,
                        attempts = retry + 1,
                        "API request failed: {request}"
                    );
                    return Err(err);
                }
            }
        }
    }
}
