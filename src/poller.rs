use crate::cancel::CancelToken;
use crate::error::{AnalysisError, FetchError};
use crate::types::Report;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Single fetch of a report by submission id.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch_report(&self, submission_id: &str) -> Result<Report, FetchError>;
}

#[async_trait]
impl<T: ReportFetcher + ?Sized> ReportFetcher for Arc<T> {
    async fn fetch_report(&self, submission_id: &str) -> Result<Report, FetchError> {
        (**self).fetch_report(submission_id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollPolicy {
    /// `max_attempts` is raised to 1; the first attempt always happens.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

/// Bounded, strictly sequential retry loop around a [`ReportFetcher`].
#[derive(Debug, Clone)]
pub struct ReportPoller<F> {
    fetcher: F,
    policy: PollPolicy,
}

impl<F: ReportFetcher> ReportPoller<F> {
    pub fn new(fetcher: F, policy: PollPolicy) -> Self {
        Self { fetcher, policy }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch until a report arrives, the attempts run out, or `cancel` fires.
    ///
    /// Attempt 1 fires immediately; each failed attempt except the last is
    /// followed by exactly one `interval` wait. Not-ready, not-found and
    /// transport failures are retried alike. A malformed body ends the poll.
    #[instrument(skip(self, cancel), fields(max_attempts = self.policy.max_attempts))]
    pub async fn poll(
        &self,
        submission_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Report>, AnalysisError> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                debug!(attempt, "poll cancelled before attempt");
                return Ok(None);
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempt, "poll cancelled during attempt");
                    return Ok(None);
                }
                outcome = self.fetcher.fetch_report(submission_id) => outcome,
            };

            match outcome {
                Ok(report) => {
                    debug!(attempt, issues = report.issues.len(), "report received");
                    return Ok(Some(report));
                }
                Err(err) if !err.is_retryable() => {
                    warn!(attempt, error = %err, "unusable report");
                    let reason = match err {
                        FetchError::Malformed(reason) => reason,
                        other => other.to_string(),
                    };
                    return Err(AnalysisError::MalformedReport(reason));
                }
                Err(err) => debug!(attempt, error = %err, "report not ready"),
            }

            if attempt < max_attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!(attempt, "poll cancelled while waiting");
                        return Ok(None);
                    }
                    _ = tokio::time::sleep(self.policy.interval) => {}
                }
            }
        }

        warn!(attempts = max_attempts, "report polling timed out");
        Err(AnalysisError::PollTimeout {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_service_contract() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.interval, Duration::from_secs(2));
    }

    #[test]
    fn zero_attempts_is_raised_to_one() {
        assert_eq!(PollPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
