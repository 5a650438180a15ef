use crate::cancel::CancelToken;
use crate::error::{AnalysisError, ValidationError};
use crate::types::{Language, Report, SourceFile, Submission};
use async_trait::async_trait;

/// The two capabilities an analysis service offers: accept a file, produce its report.
///
/// The workflow only ever talks to this trait; whether the remote service or
/// the simulated one answers is decided once per upload cycle.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn upload(&self, file: &SourceFile, language: Language)
        -> Result<Submission, AnalysisError>;

    /// Wait for the report of `submission_id`.
    ///
    /// Returns `Ok(None)` when `cancel` fired before a report arrived; a
    /// cancelled poll never yields an error.
    async fn poll(
        &self,
        submission_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Report>, AnalysisError>;
}

/// Local checks every backend applies before doing any work.
pub fn validate_upload(file: &SourceFile, language: Language) -> Result<(), AnalysisError> {
    if !language.is_supported() {
        return Err(ValidationError::UnsupportedLanguage(language).into());
    }
    if file.is_empty() {
        return Err(ValidationError::EmptyFile.into());
    }
    Ok(())
}
