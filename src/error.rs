//! Error taxonomy for the submit → poll → browse pipeline.
//!
//! - [`ValidationError`]: rejected locally, never reaches the network
//! - [`AnalysisError`]: terminal failure of one upload cycle
//! - [`FetchError`]: a single failed report fetch, retried by the poller
//! - [`WorkflowError`]: an action the controller refused in its current state

use crate::types::Language;

/// Fallback shown when an upload fails without a server-supplied message.
pub const UPLOAD_FALLBACK_MESSAGE: &str = "An error occurred while uploading the file.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please select a file")]
    NoFileSelected,

    #[error("the selected file is empty")]
    EmptyFile,

    #[error("only .{expected} files are accepted (got {file_name})")]
    UnsupportedExtension {
        file_name: String,
        expected: &'static str,
    },

    #[error("{} is not supported yet", .0.display_name())]
    UnsupportedLanguage(Language),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Upload { message: String },

    #[error("timed out waiting for the report after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("the backend returned a malformed report: {0}")]
    MalformedReport(String),

    #[error("no submission with id {0}")]
    UnknownSubmission(String),
}

/// What the user can do after a cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Upload the file again.
    Resubmit,
    /// Poll again for the same submission id.
    RetryPoll,
}

impl AnalysisError {
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn retry_action(&self) -> RetryAction {
        match self {
            Self::PollTimeout { .. } => RetryAction::RetryPoll,
            _ => RetryAction::Resubmit,
        }
    }
}

/// One failed attempt at fetching a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("report not ready (HTTP {0})")]
    NotReady(u16),

    #[error("report not found")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed report: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Everything but a malformed body means "try again later".
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no report is ready to view")]
    ReportNotReady,

    #[error("nothing to retry")]
    NothingToRetry,

    #[error("no report is open")]
    NoOpenReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retried_by_polling() {
        let err = AnalysisError::PollTimeout { attempts: 30 };
        assert_eq!(err.retry_action(), RetryAction::RetryPoll);
        assert!(err.user_message().contains("30 attempts"));
    }

    #[test]
    fn upload_errors_are_retried_by_resubmitting() {
        assert_eq!(
            AnalysisError::upload("boom").retry_action(),
            RetryAction::Resubmit
        );
        assert_eq!(
            AnalysisError::MalformedReport("missing summary".into()).retry_action(),
            RetryAction::Resubmit
        );
    }

    #[test]
    fn upload_message_is_shown_verbatim() {
        assert_eq!(AnalysisError::upload("File too large").user_message(), "File too large");
    }

    #[test]
    fn unsupported_language_message_uses_display_name() {
        let err = ValidationError::UnsupportedLanguage(Language::CSharp);
        assert_eq!(err.to_string(), "C# is not supported yet");
    }

    #[test]
    fn only_malformed_fetches_are_fatal() {
        assert!(FetchError::NotFound.is_retryable());
        assert!(FetchError::NotReady(503).is_retryable());
        assert!(FetchError::Transport("reset".into()).is_retryable());
        assert!(!FetchError::Malformed("bad".into()).is_retryable());
    }
}
