//! Exponential backoff around remote calls.
//!
//! [`RetryingCaller`] re-invokes an operation while it fails with a transient
//! error ([`AppError::is_transient`]) or while its result is rejected by an
//! acceptance predicate. The delay starts at the configured base and doubles
//! after every retry. By default there is no attempt limit and no delay cap,
//! so a slow upstream is waited on indefinitely.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;

use crate::config::Config;
use crate::error::AppError;

/// Base delay used when nothing is configured.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Endless `base, 2*base, 4*base, ...` delay sequence, saturating at
/// [`Duration::MAX`].
#[derive(Debug, Clone, Copy)]
pub struct DoublingBackoff {
    next: Duration,
}

impl DoublingBackoff {
    pub fn new(base: Duration) -> Self {
        Self { next: base }
    }
}

impl Iterator for DoublingBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = current.checked_mul(2).unwrap_or(Duration::MAX);
        Some(current)
    }
}

/// Milliseconds of `delay` for logging, clamped once the backoff saturates.
fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Runs remote operations under the doubling backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryingCaller {
    base_delay: Duration,
    max_retries: Option<u32>,
}

impl Default for RetryingCaller {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, None)
    }
}

impl RetryingCaller {
    /// `max_retries = None` retries forever.
    pub fn new(base_delay: Duration, max_retries: Option<u32>) -> Self {
        Self {
            base_delay,
            max_retries,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.retry_base_delay_ms),
            config.retry_max_attempts,
        )
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delays slept between attempts. Each one is logged as it is taken.
    fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let limit = self.max_retries.map_or(usize::MAX, |n| n as usize);
        DoublingBackoff::new(self.base_delay)
            .take(limit)
            .inspect(|delay| {
                tracing::info!(
                    delay_ms = delay_millis(*delay),
                    "Retrying request in {:.1} seconds",
                    delay.as_secs_f64()
                );
            })
    }

    /// Calls `operation` until it succeeds, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Propagates the first non-transient error unchanged. Returns
    /// [`AppError::RetriesExhausted`] when a configured ceiling is reached.
    pub async fn call<T, F, Fut>(&self, operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.call_until(operation, |_| true).await
    }

    /// Calls `operation` until it succeeds with a result `accept` holds for.
    ///
    /// A rejected result is treated exactly like a transient error.
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn call_until<T, F, Fut, P>(&self, mut operation: F, accept: P) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
        P: Fn(&T) -> bool,
    {
        let accept = &accept;
        let result = RetryIf::spawn(
            self.delays(),
            || {
                let attempt = operation();
                async move {
                    let value = attempt.await?;
                    if accept(&value) {
                        Ok(value)
                    } else {
                        Err(AppError::not_ready("response rejected by acceptance predicate"))
                    }
                }
            },
            AppError::is_transient,
        )
        .await;

        match result {
            Err(e) if e.is_transient() => Err(AppError::RetriesExhausted {
                attempts: self.max_retries.unwrap_or(u32::MAX),
            }),
            other => other,
        }
    }
}
