//! Backoff for idempotent reads.
//!
//! Only the session's GET path retries. Writes are never repeated because the
//! server gives no idempotency keys.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::config::RetrySettings;

/// Exponential backoff parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: usize,
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            min_delay: Duration::from_millis(settings.min_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            max_retries: settings.max_retries,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_retries: 0,
            with_jitter: false,
        }
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    pub fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);
        if self.with_jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

/// Run `operation`, retrying with backoff while `is_retryable` says so.
///
/// Each retry is logged at debug level with `what` and `short_message(err)`.
pub async fn with_retry<T, E, F, Fut, R, M>(
    operation: F,
    config: &RetryConfig,
    is_retryable: R,
    short_message: M,
    what: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    M: Fn(&E) -> String,
{
    let mut retries = 0u32;
    operation
        .retry(config.backoff())
        .when(|err: &E| is_retryable(err))
        .notify(|err: &E, delay: Duration| {
            retries += 1;
            tracing::debug!(
                "{} failed ({}), retry {} in {:?}",
                what,
                short_message(err),
                retries,
                delay
            );
        })
        .await
}
