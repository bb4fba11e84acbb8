use std::time::Duration;

use reqwest_middleware::Error;
use reqwest_retry::{Retryable, RetryableStrategy};
use retry_policies::policies::ExponentialBackoff;
use retry_policies::Jitter;
use serde::Deserialize;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Bounded retry with capped exponential backoff and full jitter.
///
/// With both delays at zero retries are immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    #[serde(default)]
    pub min_delay_ms: u64,
    #[serde(default)]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn with_max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries,
            ..self
        }
    }

    /// Backoff schedule for the retry middleware, `1 + max_retries` attempts in total
    pub fn backoff(&self) -> ExponentialBackoff {
        let min = Duration::from_millis(self.min_delay_ms);
        let max = Duration::from_millis(self.max_delay_ms.max(self.min_delay_ms));
        let jitter = if max.is_zero() {
            Jitter::None
        } else {
            Jitter::Full
        };
        ExponentialBackoff::builder()
            .retry_bounds(min, max)
            .jitter(jitter)
            .build_with_max_retries(self.max_retries)
    }
}

/// Marks every failure as retryable, error statuses as well as transport errors
pub struct RetryEveryFailure;

impl RetryableStrategy for RetryEveryFailure {
    fn handle(&self, res: &Result<reqwest::Response, Error>) -> Option<Retryable> {
        match res {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => {
                tracing::warn!("Request failed with status {}, will retry", response.status());
                Some(Retryable::Transient)
            }
            Err(err) => {
                tracing::warn!("Request failed ({}), will retry", err);
                Some(Retryable::Transient)
            }
        }
    }
}
