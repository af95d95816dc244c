//! Retry logic for object store operations.
//!
//! Provides exponential backoff with jitter for transient S3 errors.
//! Engine execution failures are never routed through here; only store
//! transport calls are wrapped.

use el_error::{classify_error, ErrorCategory};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Whether to add jitter to backoff times.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff in milliseconds.
    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Set the maximum backoff in milliseconds.
    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let base_ms = self.initial_backoff_ms * 2u64.pow(attempt);
        let capped_ms = base_ms.min(self.max_backoff_ms);

        let final_ms = if self.jitter {
            let jitter_range = capped_ms / 4; // 25% jitter
            let jitter = rand::rng().random_range(0..=jitter_range);
            capped_ms.saturating_add(jitter)
        } else {
            capped_ms
        };

        Duration::from_millis(final_ms)
    }
}

/// Execute an async store operation with retry logic.
///
/// Transient errors (throttling, 5xx, timeouts) are retried with
/// exponential backoff; permanent errors (missing key, access denied)
/// return immediately.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut last_error: Option<E> = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if classify_error(&e.to_string()) == ErrorCategory::Permanent {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        "Non-retryable error"
                    );
                    return Err(e);
                }

                if attempt < config.max_retries {
                    let backoff = config.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis(),
                        "Retryable error, backing off"
                    );
                    sleep(backoff).await;
                }

                last_error = Some(e);
            }
        }
    }

    Err(last_error.expect("should have last error after all retries"))
}
