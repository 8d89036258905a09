//! # Rate Limited Executor
//!
//! Runs a single custody API call and retries it while the API answers
//! HTTP 429.
//!
//! ## Retry Flow
//!
//! ```text
//! call() ──ok──────────────────────────────→ return value
//!    │
//!    ├─ 429 and retries left → sleep(retry-after or default) → call() again
//!    │
//!    └─ 429 with no retries left, or any other error → return error unchanged
//! ```
//!
//! Only throttling is retried. Every other failure reaches the caller on the
//! first occurrence. The wait is a `tokio::time::sleep`, so other tasks keep
//! running while a call is backing off.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::custody::ApiError;
use crate::utils::parse_retry_after_ms;

/// Retry budget used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 30;

/// Wait used when a 429 has no usable `retry-after` header.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(1000);

/// Executes custody API calls, absorbing throttling.
///
/// ## Usage
///
/// ```rust,ignore
/// let executor = RateLimitedExecutor::default();
/// let details = executor.execute(|| api.asset_details("USDC_ETH")).await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RateLimitedExecutor {
    /// Retries allowed per logical call.
    max_retries: u32,

    /// Wait used when the server gives no hint.
    default_wait: Duration,
}

impl Default for RateLimitedExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_WAIT)
    }
}

impl RateLimitedExecutor {
    pub fn new(max_retries: u32, default_wait: Duration) -> Self {
        Self {
            max_retries,
            default_wait,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.rate_limit_max_retries, config.rate_limit_default_wait)
    }

    /// Run `call` with the configured retry budget.
    pub async fn execute<F, Fut, T>(&self, call: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.execute_with_retries(call, self.max_retries).await
    }

    /// Run `call`, retrying up to `max_retries` times on HTTP 429.
    ///
    /// Each retry is a fresh invocation of `call`. A call that is throttled
    /// `k` times and then succeeds is invoked `k + 1` times.
    ///
    /// ## Returns
    ///
    /// * `Ok(T)` - The call succeeded, possibly after retries
    /// * `Err(ApiError::RateLimited)` - The last 429, once the budget is spent
    /// * `Err(...)` - Any other failure, unchanged and never retried
    pub async fn execute_with_retries<F, Fut, T>(
        &self,
        mut call: F,
        max_retries: u32,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut retries_left = max_retries;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() && retries_left > 0 => {
                    let wait = self.wait_for(&err);
                    retries_left -= 1;
                    warn!(
                        "Custody API rate limited, retrying in {}ms ({} retries left)",
                        wait.as_millis(),
                        retries_left
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    if err.is_rate_limited() {
                        warn!("Custody API still rate limited after {} retries", max_retries);
                    } else {
                        debug!("Custody API call failed: {}", err);
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Wait before retrying after `err`.
    fn wait_for(&self, err: &ApiError) -> Duration {
        parse_retry_after_ms(err.retry_after_hint()).unwrap_or(self.default_wait)
    }
}
