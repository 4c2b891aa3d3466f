//! Exponential-backoff retry executor.
//!
//! ```text
//! ATTEMPT(n) --ok--> DONE
//!     |
//!   error
//!     |
//!     +-- RetryClass::Never ----------------> FAILED(error)
//!     +-- n == max_retries -----------------> FAILED(last error)
//!     +-- otherwise: sleep(delay(n)), n+1 --> ATTEMPT(n+1)
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::{DataError, RetryClass};

/// Backoff parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay after failed attempt `attempt` (1-based):
    /// `min(initial_delay * factor^(attempt-1), max_delay)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.factor.powi(exponent);
        if !secs.is_finite() || secs < 0.0 {
            return self.max_delay;
        }
        Duration::try_from_secs_f64(secs)
            .map(|delay| delay.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

/// Errors that can tell the executor whether another attempt makes sense.
pub trait Retryable {
    fn retry_class(&self) -> RetryClass;
}

impl Retryable for DataError {
    fn retry_class(&self) -> RetryClass {
        DataError::retry_class(self)
    }
}

/// Runs `operation` until it succeeds, fails permanently, or exhausts
/// `config.max_retries` attempts. The last error is returned.
///
/// Backoff waits are `tokio::time::sleep` suspensions and do not block the
/// runtime.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if err.retry_class() == RetryClass::Never {
                    debug!("Attempt {} failed permanently: {}", attempt, err);
                    return Err(err);
                }
                if attempt >= max_attempts {
                    warn!("Giving up after {} attempts: {}", attempt, err);
                    return Err(err);
                }
                let delay = config.delay_for_attempt(attempt);
                debug!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt, max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
