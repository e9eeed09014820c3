//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Per-client request throttle.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key` (usually the client address) and say
    /// whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Time until the next request from this key would be accepted.
    pub retry_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
