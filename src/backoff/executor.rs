use std::future::Future;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::error::ExtractError;

use super::policy::BackoffPolicy;
use super::schedule::jittered;

/// How the executor treats a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Retryable,
    Terminal,
}

pub type DefaultClassifier = fn(&ExtractError) -> Classification;

/// Classification backed by [`ExtractError::is_retryable`].
pub fn default_classification(err: &ExtractError) -> Classification {
    if err.is_retryable() {
        Classification::Retryable
    } else {
        Classification::Terminal
    }
}

/// Drives an action until it succeeds, fails terminally, runs out of
/// attempts, or the cancellation token fires.
///
/// The executor only owns configuration; every [`execute`](Self::execute)
/// call keeps its own attempt counter and delay schedule.
pub struct BackoffExecutor<C = DefaultClassifier> {
    policy: BackoffPolicy,
    classify: C,
    cancel: CancellationToken,
}

impl BackoffExecutor<DefaultClassifier> {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            classify: default_classification,
            cancel: CancellationToken::new(),
        }
    }
}

impl<C> BackoffExecutor<C>
where
    C: Fn(&ExtractError) -> Classification,
{
    /// Replaces the retry predicate.
    pub fn with_classifier<D>(self, classify: D) -> BackoffExecutor<D>
    where
        D: Fn(&ExtractError) -> Classification,
    {
        BackoffExecutor {
            policy: self.policy,
            classify,
            cancel: self.cancel,
        }
    }

    /// Aborts attempts and waits once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub async fn execute<F, Fut, T>(&self, mut action: F) -> Result<T, ExtractError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExtractError>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut schedule = self.policy.schedule();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(ExtractError::Cancelled(format!(
                        "aborted during attempt {attempt}"
                    )));
                }
                outcome = action() => outcome,
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if (self.classify)(&err) == Classification::Terminal {
                return Err(err);
            }
            if attempt >= max_attempts {
                return Err(ExtractError::RetryExceeded {
                    attempts: attempt,
                    last_error: err.to_string(),
                });
            }

            let delay = schedule.next().unwrap_or(self.policy.max_delay());
            let wait = if self.policy.jitter() {
                jittered(delay)
            } else {
                delay
            };
            log::warn!("attempt {attempt}/{max_attempts} failed: {err}; retrying in {wait:?}");

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(ExtractError::Cancelled(format!(
                        "aborted while waiting to retry after attempt {attempt}"
                    )));
                }
                _ = sleep(wait) => {}
            }
        }
    }
}
