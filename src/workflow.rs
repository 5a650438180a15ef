//! Upload cycle orchestration.
//!
//! [`UploadWorkflow`] drives one cycle at a time through
//! `Idle → Uploading → AwaitingReport → ReportReady`, landing in `Failed` on
//! any error. Each cycle gets a fresh id and [`CancelToken`]; starting a new
//! cycle or closing the report cancels the previous token, and any result
//! that still arrives for an old cycle id is dropped without touching state.

use crate::backend::AnalysisBackend;
use crate::cancel::CancelToken;
use crate::error::{AnalysisError, ValidationError, WorkflowError};
use crate::types::{Language, Report, SourceFile, Submission};
use crate::view::ReportView;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Uploading,
    AwaitingReport {
        submission: Submission,
    },
    ReportReady {
        submission: Submission,
        report: Arc<Report>,
    },
    Failed {
        error: AnalysisError,
        /// Present when the upload succeeded and the poll failed.
        submission: Option<Submission>,
    },
}

impl WorkflowState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::AwaitingReport { .. })
    }

    pub fn submission(&self) -> Option<&Submission> {
        match self {
            Self::AwaitingReport { submission } | Self::ReportReady { submission, .. } => {
                Some(submission)
            }
            Self::Failed { submission, .. } => submission.as_ref(),
            Self::Idle | Self::Uploading => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Which implementation serves the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Remote,
    Simulated,
}

struct Inner {
    state: WorkflowState,
    file: Option<SourceFile>,
    language: Language,
    backend_kind: BackendKind,
    cycle: u64,
    cancel: CancelToken,
    cycle_backend: Option<Arc<dyn AnalysisBackend>>,
    view: Option<ReportView>,
}

impl Inner {
    /// Supersede whatever cycle is running and discard its results.
    fn begin_cycle(&mut self, backend: Arc<dyn AnalysisBackend>) -> (u64, CancelToken) {
        self.cancel.cancel();
        self.cycle += 1;
        self.cancel = CancelToken::new();
        self.cycle_backend = Some(backend);
        self.view = None;
        (self.cycle, self.cancel.clone())
    }
}

#[derive(Clone)]
pub struct UploadWorkflow {
    remote: Arc<dyn AnalysisBackend>,
    simulated: Arc<dyn AnalysisBackend>,
    inner: Arc<Mutex<Inner>>,
}

impl UploadWorkflow {
    pub fn new(remote: Arc<dyn AnalysisBackend>, simulated: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            remote,
            simulated,
            inner: Arc::new(Mutex::new(Inner {
                state: WorkflowState::Idle,
                file: None,
                language: Language::default(),
                backend_kind: BackendKind::default(),
                cycle: 0,
                cancel: CancelToken::new(),
                cycle_backend: None,
                view: None,
            })),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state.clone()
    }

    pub fn selected_file(&self) -> Option<SourceFile> {
        self.inner.lock().file.clone()
    }

    pub fn language(&self) -> Language {
        self.inner.lock().language
    }

    /// Takes effect for the next cycle; a running cycle keeps its backend.
    pub fn set_backend(&self, kind: BackendKind) {
        self.inner.lock().backend_kind = kind;
    }

    /// Pick the file to upload, or clear the selection with `None`.
    ///
    /// Files whose extension does not match the selected language are refused
    /// and the previous selection is kept.
    pub fn select_file(&self, file: Option<SourceFile>) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock();
        if let Some(f) = &file {
            let expected = inner.language.extension();
            if !f.has_extension(expected) {
                return Err(ValidationError::UnsupportedExtension {
                    file_name: f.name.clone(),
                    expected,
                }
                .into());
            }
        }
        inner.file = file;
        Ok(())
    }

    pub fn select_language(&self, language: Language) -> Result<(), WorkflowError> {
        if !language.is_supported() {
            return Err(ValidationError::UnsupportedLanguage(language).into());
        }
        self.inner.lock().language = language;
        Ok(())
    }

    /// Upload the selected file and wait for its report.
    ///
    /// Only local validation problems are returned as errors; they leave the
    /// state untouched. Every other outcome is recorded in [`state`](Self::state).
    /// Returns once this cycle finished or was superseded.
    pub async fn submit(&self) -> Result<(), WorkflowError> {
        let (cycle, cancel, backend, file, language) = {
            let mut inner = self.inner.lock();
            let file = inner.file.clone().ok_or(ValidationError::NoFileSelected)?;
            if file.is_empty() {
                return Err(ValidationError::EmptyFile.into());
            }
            let language = inner.language;
            if !language.is_supported() {
                return Err(ValidationError::UnsupportedLanguage(language).into());
            }
            let backend = match inner.backend_kind {
                BackendKind::Remote => Arc::clone(&self.remote),
                BackendKind::Simulated => Arc::clone(&self.simulated),
            };
            let (cycle, cancel) = inner.begin_cycle(Arc::clone(&backend));
            inner.state = WorkflowState::Uploading;
            info!(cycle, file = %file.name, backend = ?inner.backend_kind, "upload cycle started");
            (cycle, cancel, backend, file, language)
        };

        let uploaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(cycle, "upload abandoned");
                return Ok(());
            }
            result = backend.upload(&file, language) => result,
        };

        match uploaded {
            Ok(submission) => {
                let applied = self.apply(cycle, |inner| {
                    inner.state = WorkflowState::AwaitingReport {
                        submission: submission.clone(),
                    };
                    // A file picked while uploading stays selected
                    if inner.file.as_ref() == Some(&file) {
                        inner.file = None;
                    }
                });
                if applied {
                    self.await_report(cycle, cancel, backend, submission).await;
                }
            }
            Err(error) => {
                self.apply(cycle, |inner| {
                    inner.state = WorkflowState::Failed {
                        error,
                        submission: None,
                    };
                });
            }
        }
        Ok(())
    }

    /// Poll again for the submission whose report timed out, without re-uploading.
    pub async fn retry_poll(&self) -> Result<(), WorkflowError> {
        let (cycle, cancel, backend, submission) = {
            let mut inner = self.inner.lock();
            let submission = match &inner.state {
                WorkflowState::Failed {
                    error: AnalysisError::PollTimeout { .. },
                    submission: Some(submission),
                } => submission.clone(),
                _ => return Err(WorkflowError::NothingToRetry),
            };
            let backend = inner
                .cycle_backend
                .clone()
                .ok_or(WorkflowError::NothingToRetry)?;
            let (cycle, cancel) = inner.begin_cycle(Arc::clone(&backend));
            inner.state = WorkflowState::AwaitingReport {
                submission: submission.clone(),
            };
            info!(cycle, submission_id = %submission.id, "retrying report poll");
            (cycle, cancel, backend, submission)
        };

        self.await_report(cycle, cancel, backend, submission).await;
        Ok(())
    }

    async fn await_report(
        &self,
        cycle: u64,
        cancel: CancelToken,
        backend: Arc<dyn AnalysisBackend>,
        submission: Submission,
    ) {
        match backend.poll(&submission.id, &cancel).await {
            Ok(Some(report)) => {
                if !report.is_consistent() {
                    warn!(submission_id = %submission.id, "report totals do not match its issues");
                }
                self.apply(cycle, |inner| {
                    inner.state = WorkflowState::ReportReady {
                        submission,
                        report: Arc::new(report),
                    };
                });
            }
            Ok(None) => debug!(cycle, "poll cancelled"),
            Err(error) => {
                self.apply(cycle, |inner| {
                    inner.state = WorkflowState::Failed {
                        error,
                        submission: Some(submission),
                    };
                });
            }
        }
    }

    /// Run `update` only if `cycle` is still the current one.
    fn apply(&self, cycle: u64, update: impl FnOnce(&mut Inner)) -> bool {
        let mut inner = self.inner.lock();
        if inner.cycle != cycle {
            debug!(cycle, current = inner.cycle, "discarding result of superseded cycle");
            return false;
        }
        update(&mut inner);
        true
    }

    /// Bind a fresh view to the ready report. Any previous view state is discarded.
    pub fn open_report(&self) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock();
        let report = match &inner.state {
            WorkflowState::ReportReady { report, .. } => Arc::clone(report),
            _ => return Err(WorkflowError::ReportNotReady),
        };
        inner.view = Some(ReportView::new(report));
        Ok(())
    }

    pub fn is_report_open(&self) -> bool {
        self.inner.lock().view.is_some()
    }

    /// Run `f` against the open report view.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut ReportView) -> R) -> Result<R, WorkflowError> {
        let mut inner = self.inner.lock();
        let view = inner.view.as_mut().ok_or(WorkflowError::NoOpenReport)?;
        Ok(f(view))
    }

    /// Close the report and abandon any outstanding work. Returns to `Idle`.
    pub fn close_report(&self) {
        let mut inner = self.inner.lock();
        inner.cancel.cancel();
        inner.cycle += 1;
        inner.cancel = CancelToken::new();
        inner.cycle_backend = None;
        inner.view = None;
        inner.state = WorkflowState::Idle;
        debug!(cycle = inner.cycle, "report closed");
    }
}
