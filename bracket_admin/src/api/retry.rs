//! Fixed-delay retry policy for outbound HTTP calls.

use super::errors::Transient;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio_retry::{RetryIf, strategy::FixedInterval};

/// Default number of attempts, first try included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between two attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How many times a call is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a new policy
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A policy that tries exactly once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `action` until it succeeds, fails with a non-transient error, or
    /// the attempt bound is reached. The last error is returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `label` - Short description of the call, used in log lines
    /// * `action` - Produces a fresh future for every attempt
    pub async fn run<A, F, T, E>(&self, label: &str, action: A) -> Result<T, E>
    where
        A: FnMut() -> F,
        F: Future<Output = Result<T, E>>,
        E: Transient + Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let delay = self.delay;
        let strategy = FixedInterval::new(delay).take((max_attempts - 1) as usize);

        let mut attempt = 0u32;
        let should_retry = |err: &E| {
            attempt += 1;
            let retry = err.is_transient() && attempt < max_attempts;
            if retry {
                log::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                    label,
                    attempt,
                    max_attempts,
                    err,
                    delay
                );
            }
            retry
        };

        RetryIf::start(strategy, action, should_retry).await
    }
}
