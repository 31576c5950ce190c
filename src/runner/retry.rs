use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Result of a retried operation
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success(T),
    Exhausted { attempts: u32, last_error: E },
}

/// Execute an async operation up to `max_attempts` times with a fixed delay
///
/// No delay follows the final attempt.
pub async fn retry_with_fixed_delay<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let delay = Duration::from_millis(config.delay_ms);
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return RetryOutcome::Success(result),
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempts, max_attempts, e);

                if attempts >= max_attempts {
                    return RetryOutcome::Exhausted {
                        attempts,
                        last_error: e,
                    };
                }

                sleep(delay).await;
            }
        }
    }
}
