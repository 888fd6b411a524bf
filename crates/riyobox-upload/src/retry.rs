//! Bounded retry state machine shared by both transfer paths.

use riyobox_core::{UploadError, UploadResult};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * 2^attempt`
    Exponential { base: Duration },
    /// `base * attempt`
    Linear { base: Duration },
}

impl Backoff {
    /// Delay after the failed 1-based `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Exponential { base } => base.saturating_mul(2u32.saturating_pow(attempt)),
            Backoff::Linear { base } => base.saturating_mul(attempt),
        }
    }
}

/// Where the retry loop stands after an attempt
#[derive(Debug)]
pub enum RetryState {
    Attempting(u32),
    Retrying { attempt: u32, delay: Duration },
    Exhausted(UploadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Whole-file policy: `1s * 2^attempt`
    pub fn exponential(max_attempts: u32) -> Self {
        Self::new(
            max_attempts,
            Backoff::Exponential {
                base: BACKOFF_BASE,
            },
        )
    }

    /// Per-part policy: `1s * attempt`
    pub fn linear(max_attempts: u32) -> Self {
        Self::new(
            max_attempts,
            Backoff::Linear {
                base: BACKOFF_BASE,
            },
        )
    }

    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Next state after `attempt` failed with `error`. No sleep follows the
    /// final attempt, and non-retryable errors end the loop at once.
    pub fn transition(&self, attempt: u32, error: UploadError) -> RetryState {
        if !error.is_retryable() || attempt >= self.max_attempts {
            return RetryState::Exhausted(error);
        }

        RetryState::Retrying {
            attempt: attempt + 1,
            delay: self.backoff.delay(attempt),
        }
    }

    /// Run `operation` until it succeeds or the policy gives up; the most
    /// recent error is returned on exhaustion.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> UploadResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = UploadResult<T>>,
    {
        let mut state = RetryState::Attempting(1);

        loop {
            match state {
                RetryState::Attempting(attempt) => {
                    if cancel.is_cancelled() {
                        return Err(UploadError::Cancelled);
                    }

                    match operation(attempt).await {
                        Ok(value) => return Ok(value),
                        Err(error) => {
                            tracing::warn!(
                                operation = label,
                                attempt = attempt,
                                max_attempts = self.max_attempts,
                                error = %error,
                                "Upload attempt failed"
                            );
                            state = self.transition(attempt, error);
                        }
                    }
                }
                RetryState::Retrying { attempt, delay } => {
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    state = RetryState::Attempting(attempt);
                }
                RetryState::Exhausted(error) => return Err(error),
            }
        }
    }
}
