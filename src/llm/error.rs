//! Provider error types with retry classification.
//!
//! Transient failures (rate limits, 5xx, network) are retried with
//! capped exponential backoff; permanent failures (4xx, unparsable
//! responses) are surfaced immediately.

use std::time::Duration;

use thiserror::Error;

/// Error from the text-classification provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("provider rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("provider server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("provider rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("network error talking to provider: {0}")]
    Network(String),

    #[error("unparsable provider response: {0}")]
    Parse(String),
}

impl UpstreamError {
    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: u16, body: String, retry_after: Option<Duration>) -> Self {
        match status {
            429 => UpstreamError::RateLimited {
                message: body,
                retry_after,
            },
            500 | 502 | 503 | 504 => UpstreamError::Server {
                status,
                message: body,
            },
            400..=499 => UpstreamError::Rejected {
                status,
                message: body,
            },
            _ => UpstreamError::Server {
                status,
                message: body,
            },
        }
    }

    /// Whether retrying the same request can plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::RateLimited { .. }
                | UpstreamError::Server { .. }
                | UpstreamError::Network(_)
        )
    }

    /// Delay before the given retry attempt (0-based).
    ///
    /// A `Retry-After` hint wins outright; otherwise exponential backoff
    /// from a per-kind base, capped at 30 seconds.
    pub fn suggested_delay(&self, attempt: u32) -> Duration {
        if let UpstreamError::RateLimited {
            retry_after: Some(delay),
            ..
        } = self
        {
            return *delay;
        }

        let base_secs = match self {
            UpstreamError::RateLimited { .. } => 5,
            UpstreamError::Server { .. } => 2,
            _ => 1,
        };

        let secs = base_secs * 2u64.saturating_pow(attempt);
        Duration::from_secs(secs.min(30))
    }
}

/// Retry policy for provider calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Hard cap on total time spent including backoff sleeps.
    pub max_retry_duration: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            max_retry_duration: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Whether `error` should be retried on the given attempt (0-based).
    pub fn should_retry(&self, error: &UpstreamError, attempt: u32) -> bool {
        error.is_transient() && attempt < self.max_retries
    }
}
