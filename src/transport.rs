//! HTTP transport for the FIPE catalog API
//!
//! Issues a single GET against a fixed base URL and retries transient failures
//! (429, 5xx gateway errors, timeouts, dropped connections) with exponential
//! backoff. The socket work sits behind [`HttpBackend`] so the retry policy can
//! be exercised without a network.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Statuses that are worth another attempt
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// A response that made it back from the server, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl HttpReply {
    /// Creates a reply with the given status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Kind of failure below the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The request did not complete within the timeout
    Timeout,
    /// Connection refused, reset, or name resolution failed
    Connection,
}

/// A request that never produced an HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionFault {
    pub kind: FaultKind,
    pub message: String,
}

impl ConnectionFault {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Timeout,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Connection,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ConnectionFault {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else {
            Self::connection(err.to_string())
        }
    }
}

/// Performs the raw HTTP GET
///
/// Implementations must not retry; [`Transport`] owns the retry loop.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpReply, ConnectionFault>;
}

/// [`HttpBackend`] backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Create a backend with a default reqwest client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a backend with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpReply, ConnectionFault> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

/// Classification of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// Request timed out
    Timeout,
    /// Connection refused, reset, or DNS failure
    Connection,
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx
    ServerError,
    /// Any other non-success status
    ClientError,
}

impl FailureCause {
    fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::ClientError,
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection error",
            Self::RateLimited => "rate limited",
            Self::ServerError => "server error",
            Self::ClientError => "client error",
        };
        f.write_str(label)
    }
}

/// The request failed, either immediately or after exhausting retries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed after {attempts} attempt(s): {cause}{}: {message}", status_suffix(.last_status))]
pub struct TransportFailure {
    /// Status of the last response, if any response arrived
    pub last_status: Option<u16>,
    /// What went wrong on the last attempt
    pub cause: FailureCause,
    /// Number of attempts made
    pub attempts: u32,
    /// Human-readable detail from the last attempt
    pub message: String,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl TransportFailure {
    fn from_reply(reply: &HttpReply, attempts: u32) -> Self {
        let mut message: String = reply.body.chars().take(200).collect();
        if message.trim().is_empty() {
            message = "empty response body".to_string();
        }
        Self {
            last_status: Some(reply.status),
            cause: FailureCause::from_status(reply.status),
            attempts,
            message,
        }
    }

    fn from_fault(fault: ConnectionFault, attempts: u32) -> Self {
        let cause = match fault.kind {
            FaultKind::Timeout => FailureCause::Timeout,
            FaultKind::Connection => FailureCause::Connection,
        };
        Self {
            last_status: None,
            cause,
            attempts,
            message: fault.message,
        }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self.last_status {
            Some(status) => RETRYABLE_STATUSES.contains(&status),
            None => true,
        }
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-indexed)
    ///
    /// Never decreases as `attempt` grows, since the multiplier is clamped to
    /// at least 1.0 and the result is capped.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// GET-only client for one base URL with retry and timeout
#[derive(Clone)]
pub struct Transport {
    backend: Arc<dyn HttpBackend>,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Transport {
    /// Create a transport over reqwest with default timeout and retry policy
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_backend(base_url, Arc::new(ReqwestBackend::new()))
    }

    /// Create a transport over a custom backend
    pub fn with_backend(base_url: impl Into<String>, backend: Arc<dyn HttpBackend>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            backend,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// GET `path` relative to the base URL
    ///
    /// Returns the reply on any 2xx status. Retryable failures are retried
    /// until the policy's attempt budget is spent; the last failure is
    /// returned. Dropping the returned future aborts the in-flight attempt or
    /// the pending backoff sleep.
    pub async fn get(&self, path: &str) -> Result<HttpReply, TransportFailure> {
        let url = format!("{}{}", self.base_url, path);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let failure = match self.backend.get(&url, self.timeout).await {
                Ok(reply) if reply.is_success() => {
                    if attempt > 1 {
                        debug!(url = %url, attempt, "Request succeeded after retry");
                    }
                    return Ok(reply);
                }
                Ok(reply) => TransportFailure::from_reply(&reply, attempt),
                Err(fault) => TransportFailure::from_fault(fault, attempt),
            };

            if !failure.is_retryable() || attempt >= max_attempts {
                warn!(
                    url = %url,
                    attempts = attempt,
                    status = ?failure.last_status,
                    cause = %failure.cause,
                    "Request failed"
                );
                return Err(failure);
            }

            let delay = self.retry.delay_after(attempt);
            debug!(
                url = %url,
                attempt,
                status = ?failure.last_status,
                cause = %failure.cause,
                delay_ms = delay.as_millis() as u64,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
