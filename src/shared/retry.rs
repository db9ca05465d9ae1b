//! Retry with exponential backoff
//!
//! Generic retry helper for transient failures (SQLite lock contention,
//! pool timeouts). The vote ledger wraps every cast in it so that two voters
//! writing at the same instant do not surface a spurious storage error.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
    /// Sleep a random 50-100% of each delay so that callers which failed
    /// together do not retry in lockstep.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(1),
            jitter: true,
        }
    }
}

fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
}

/// Execute an async operation with exponential backoff retry.
///
/// `should_retry` decides whether a given error is transient (retry) or
/// permanent (return immediately).
///
/// ```ignore
/// let vote = retry_with_backoff(
///     RetryConfig::default(),
///     || repos.votes().cast(ballot.clone(), now),
///     DomainError::is_transient,
///     "cast_vote",
/// ).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: RetryConfig,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = config.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt >= config.max_attempts || !should_retry(&err) {
                    if attempt > 1 {
                        warn!(
                            operation = operation_name,
                            attempt,
                            max_attempts = config.max_attempts,
                            error = %err,
                            "Operation failed permanently"
                        );
                    }
                    return Err(err);
                }

                let pause = if config.jitter { jittered(delay) } else { delay };
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    retry_in_ms = pause.as_millis() as u64,
                    "Transient failure, retrying"
                );

                tokio::time::sleep(pause).await;

                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
                attempt += 1;
            }
        }
    }
}
