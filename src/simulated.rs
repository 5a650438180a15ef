use crate::backend::{validate_upload, AnalysisBackend};
use crate::cancel::CancelToken;
use crate::error::AnalysisError;
use crate::scanner;
use crate::types::{
    Grade, Issue, Language, QualityScore, Report, ReportSummary, Severity, SourceFile, Submission,
    SubmissionStatus,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_REPORT_DELAY: Duration = Duration::from_millis(1500);

struct PendingAnalysis {
    language: Language,
    issues: Vec<Issue>,
}

/// Offline stand-in for the analysis service.
///
/// Uploads are accepted immediately and analysed with the local [`scanner`];
/// the report becomes available after `delay`.
pub struct SimulatedBackend {
    delay: Duration,
    pending: Mutex<HashMap<String, PendingAnalysis>>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_DELAY)
    }
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn build_report(submission_id: &str, analysis: &PendingAnalysis) -> Report {
        let count = |severity: Severity| {
            analysis
                .issues
                .iter()
                .filter(|i| i.severity == severity)
                .count() as u32
        };
        let (errors, warnings, infos) = (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        );
        let score = quality_score(errors, warnings, infos);
        let (grade, evaluation) = grade_for(score);

        Report {
            submission_id: submission_id.to_string(),
            language: analysis.language,
            calculated_at: Utc::now(),
            summary: ReportSummary {
                errors,
                warnings,
                infos,
                total_issues: errors + warnings + infos,
                quality_score: QualityScore::Number(f64::from(score)),
                grade,
                evaluation_key: evaluation.to_string(),
            },
            issues: analysis.issues.clone(),
        }
    }
}

fn quality_score(errors: u32, warnings: u32, infos: u32) -> u32 {
    100u32.saturating_sub(errors * 10 + warnings * 4 + infos)
}

fn grade_for(score: u32) -> (Grade, &'static str) {
    match score {
        90..=100 => (Grade::A, "excellent"),
        80..=89 => (Grade::B, "good"),
        70..=79 => (Grade::C, "fair"),
        60..=69 => (Grade::D, "poor"),
        _ => (Grade::F, "critical"),
    }
}

#[async_trait]
impl AnalysisBackend for SimulatedBackend {
    async fn upload(
        &self,
        file: &SourceFile,
        language: Language,
    ) -> Result<Submission, AnalysisError> {
        validate_upload(file, language)?;

        let source = String::from_utf8_lossy(&file.content);
        let issues = scanner::scan(&source);
        let id = Uuid::new_v4().to_string();
        info!(submission_id = %id, issues = issues.len(), "simulated upload accepted");

        self.pending
            .lock()
            .insert(id.clone(), PendingAnalysis { language, issues });

        Ok(Submission {
            id,
            language,
            file_name: file.name.clone(),
            message: "Accepted".to_string(),
            status: SubmissionStatus::Accepted,
        })
    }

    async fn poll(
        &self,
        submission_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Report>, AnalysisError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(submission_id, "simulated poll cancelled");
                return Ok(None);
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let pending = self.pending.lock();
        let analysis = pending
            .get(submission_id)
            .ok_or_else(|| AnalysisError::UnknownSubmission(submission_id.to_string()))?;
        Ok(Some(Self::build_report(submission_id, analysis)))
    }
}
