//! Classify-and-backoff retry utility.

use hokusai_error::{ConfigError, FailureClass, HokusaiError, HokusaiResult, RetryableError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::jitter};
use tracing::{debug, instrument, warn};

/// Exponential backoff for transient failures.
///
/// The defaults wait 15s before the first retry and grow each wait by half,
/// giving up after five retries.
///
/// # Examples
///
/// ```
/// use hokusai_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let delays = RetryPolicy::default().delays();
/// assert_eq!(delays.len(), 5);
/// assert_eq!(delays[0], Duration::from_millis(15_000));
/// assert_eq!(delays[1], Duration::from_millis(22_500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, derive_getters::Getters)]
#[serde(default)]
pub struct RetryPolicy {
    /// Wait before the first retry
    initial_delay_ms: u64,
    /// Growth factor applied to each subsequent wait
    multiplier: f64,
    /// Retries after the initial attempt
    max_retries: usize,
    /// Randomize each wait
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 15_000,
            multiplier: 1.5,
            max_retries: 5,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Create a policy without jitter.
    pub fn new(initial_delay_ms: u64, multiplier: f64, max_retries: usize) -> Self {
        Self {
            initial_delay_ms,
            multiplier,
            max_retries,
            jitter: false,
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(0, 1.0, 0)
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// The wait before each retry, in order.
    pub fn delays(&self) -> Vec<Duration> {
        let mut delay = self.initial_delay_ms as f64;
        (0..self.max_retries)
            .map(|_| {
                let current = Duration::from_millis(delay.round() as u64);
                delay *= self.multiplier;
                current
            })
            .collect()
    }

    /// Check the multiplier is usable.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for multipliers below 1.0 or not finite.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigError::new(format!(
                "Retry multiplier must be at least 1.0, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

/// Run `operation`, retrying transient failures according to `policy`.
///
/// Failures are classified through [`RetryableError`]: only the transient
/// class is retried. Rate limits, safety blocks and permanent errors are
/// returned after the first failing attempt so callers can react to them.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error.
///
/// # Examples
///
/// ```
/// use hokusai_error::{GenerationError, GenerationErrorKind, HokusaiError};
/// use hokusai_rate_limit::{RetryPolicy, with_backoff};
///
/// # #[tokio::main]
/// # async fn main() {
/// let result: Result<(), HokusaiError> = with_backoff(&RetryPolicy::default(), "render", || async {
///     Err(GenerationError::new(GenerationErrorKind::Http {
///         status_code: 429,
///         message: "Resource exhausted".to_string(),
///     })
///     .into())
/// })
/// .await;
/// // Rate limits are not retried here.
/// assert!(result.is_err());
/// # }
/// ```
#[instrument(skip(policy, operation), fields(max_retries = policy.max_retries))]
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> HokusaiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HokusaiResult<T>>,
{
    with_backoff_classified(policy, operation_name, operation, |e| e.failure_class()).await
}

/// Like [`with_backoff`], with the failure classification supplied by the caller.
///
/// Only failures that `classify` maps to [`FailureClass::Transient`] are retried.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first error
/// classified as anything but transient.
pub async fn with_backoff_classified<T, F, Fut, C>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
    classify: C,
) -> HokusaiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HokusaiResult<T>>,
    C: Fn(&HokusaiError) -> FailureClass,
{
    let delays = policy.delays();
    let strategy = delays
        .into_iter()
        .map(|delay| if policy.jitter { jitter(delay) } else { delay });

    let classify = &classify;
    let mut attempt = 0usize;
    Retry::spawn(strategy, || {
        attempt += 1;
        let current = attempt;
        let pending = operation();
        async move {
            match pending.await {
                Ok(value) => {
                    debug!(
                        operation = operation_name,
                        attempt = current,
                        "Operation succeeded"
                    );
                    Ok(value)
                }
                Err(e) => match classify(&e) {
                    FailureClass::Transient => {
                        warn!(
                            operation = operation_name,
                            attempt = current,
                            error = %e,
                            "Transient failure, backing off"
                        );
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    class => {
                        warn!(
                            operation = operation_name,
                            attempt = current,
                            %class,
                            error = %e,
                            "Failure not retried"
                        );
                        Err(RetryError::Permanent(e))
                    }
                },
            }
        }
    })
    .await
}
