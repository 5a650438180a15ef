//! Quality report client.
//!
//! Uploads a source file to an analysis service, polls until its report is
//! ready and exposes the report through a browsable view model.
//!
//! - `types`: submissions, issues, reports and the enums around them
//! - `client`: HTTP upload, report fetch and the remote backend
//! - `poller`: bounded, cancellable report polling
//! - `simulated`: offline backend built on `scanner` and `rules`
//! - `view`: issue browsing state machine
//! - `workflow`: the upload cycle controller
//! - `labels`: display strings
//! - `config`: file + CLI configuration
pub mod backend;
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod labels;
pub mod logging;
pub mod poller;
pub mod rules;
pub mod scanner;
pub mod simulated;
pub mod types;
pub mod view;
pub mod workflow;

pub use backend::AnalysisBackend;
pub use cancel::CancelToken;
pub use error::{AnalysisError, FetchError, RetryAction, ValidationError, WorkflowError};
pub use types::{Grade, Issue, Language, Report, ReportSummary, Severity, SourceFile, Submission, ViewMode};
pub use view::{DetailTab, ReportView};
pub use workflow::{BackendKind, UploadWorkflow, WorkflowState};
