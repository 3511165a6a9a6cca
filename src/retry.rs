//! Retrying page loads that the site answered with a rate limit.

use crate::{Result, ScrapeError};
use std::future::Future;

/// How patiently a rate-limited page load is retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Reloads attempted after the first rate limit
    pub max_retries: u32,
    /// Seconds added on top of `Retry-After`, doubled per reload
    pub base_delay: u64,
    /// Upper bound for one wait, unless the site asked for longer
    pub max_delay: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: 5,
            max_delay: 300, // 5 minutes
        }
    }
}

/// A loaded value and the waiting it took to get it.
#[derive(Debug)]
pub struct RetryResult<T> {
    pub result: T,
    /// Reloads needed after rate limits
    pub attempts_made: u32,
    /// Seconds spent waiting between reloads
    pub total_retry_time: u64,
}

/// Delay before retry number `retries` (0-based) after a rate limit that
/// asked for `retry_after` seconds.
pub fn backoff_delay(config: &RetryConfig, retries: u32, retry_after: u64) -> u64 {
    let base_backoff = config.base_delay.saturating_mul(2_u64.saturating_pow(retries));
    std::cmp::min(
        retry_after.saturating_add(base_backoff),
        config.max_delay.max(retry_after),
    )
}

/// Load `target` with `load`, waiting and reloading while it is rate limited.
///
/// Only [`ScrapeError::RateLimit`] is retried; every other error is returned
/// straight away. `on_rate_limit` is told the delay before each wait.
pub async fn retry_with_backoff<T, F, Fut, OnRateLimit>(
    config: RetryConfig,
    target: &str,
    mut load: F,
    mut on_rate_limit: OnRateLimit,
) -> Result<RetryResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    OnRateLimit: FnMut(u64, &str),
{
    let mut retries = 0;
    let mut total_retry_time = 0;

    loop {
        match load().await {
            Ok(result) => {
                return Ok(RetryResult {
                    result,
                    attempts_made: retries,
                    total_retry_time,
                });
            }
            Err(ScrapeError::RateLimit { retry_after }) => {
                if retries >= config.max_retries {
                    log::warn!(
                        "Still rate limited after {} reloads of {}",
                        config.max_retries,
                        target
                    );
                    return Err(ScrapeError::RateLimit { retry_after });
                }

                let delay = backoff_delay(&config, retries, retry_after);

                log::info!(
                    "{} rate limited. Waiting {} seconds before reload {} of {}",
                    target,
                    delay,
                    retries + 1,
                    config.max_retries
                );

                on_rate_limit(delay, target);

                tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
                retries += 1;
                total_retry_time += delay;
            }
            Err(other_error) => {
                return Err(other_error);
            }
        }
    }
}

/// [`retry_with_backoff`] that only logs each wait.
pub async fn retry_operation<T, F, Fut>(
    config: RetryConfig,
    target: &str,
    load: F,
) -> Result<RetryResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_with_backoff(config, target, load, |delay, url| {
        log::debug!("Rate limited loading {url}: waiting {delay} seconds");
    })
    .await
}
