use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,   // Breaks the program or is certainly wrong
    Warning, // Likely a bug or a bad practice
    Info,    // Style and readability
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    All,
    Sequential,
}

/// Source languages the analysis service knows about.
///
/// Only [`Language::Python`] is accepted today. The others are listed so
/// front ends can show them as disabled options.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    CSharp,
    Java,
    Cpp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub language: Language,
    pub enabled: bool,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::CSharp,
        Language::Java,
        Language::Cpp,
    ];

    /// Wire tag sent alongside the uploaded file.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::CSharp => "csharp",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::CSharp => "C#",
            Language::Java => "Java",
            Language::Cpp => "C++",
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self, Language::Python)
    }

    /// The single file extension accepted for this language, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::CSharp => "cs",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|l| l.tag().eq_ignore_ascii_case(tag.trim()))
    }

    pub fn options() -> Vec<LanguageOption> {
        Language::ALL
            .into_iter()
            .map(|language| LanguageOption {
                language,
                enabled: language.is_supported(),
            })
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { name, content })
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    /// The backend queued the file for analysis.
    Accepted,
}

/// Handle for one uploaded file pending analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub id: String,
    pub language: Language,
    pub file_name: String,
    pub message: String,
    pub status: SubmissionStatus,
}

/// Body of an accepted upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadReceipt {
    pub submission_id: String,
    pub language: Language,
    pub file_name: String,
    #[serde(default)]
    pub message: String,
}

impl From<UploadReceipt> for Submission {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            id: receipt.submission_id,
            language: receipt.language,
            file_name: receipt.file_name,
            message: receipt.message,
            status: SubmissionStatus::Accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub localized_explanation: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    #[serde(default)]
    pub bad_example: String,
    #[serde(default)]
    pub good_example: String,
    #[serde(default)]
    pub fix_suggestion: String,
}

impl Issue {
    /// Localized explanation when the backend supplied one, the raw message otherwise.
    pub fn explanation(&self) -> &str {
        if self.localized_explanation.trim().is_empty() {
            &self.message
        } else {
            &self.localized_explanation
        }
    }
}

/// Score as reported by the backend; some deployments send a number, others a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityScore {
    Number(f64),
    Text(String),
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityScore::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            QualityScore::Number(n) => write!(f, "{:.1}", n),
            QualityScore::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub errors: u32,
    pub warnings: u32,
    pub infos: u32,
    pub total_issues: u32,
    #[serde(rename = "codeQuality")]
    pub quality_score: QualityScore,
    pub grade: Grade,
    #[serde(rename = "evaluation")]
    pub evaluation_key: String,
}

impl ReportSummary {
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.infos,
        }
    }

    /// Rounded percentage of all issues with the given severity. Zero when there are no issues.
    pub fn share(&self, severity: Severity) -> u32 {
        if self.total_issues == 0 {
            return 0;
        }
        let pct = f64::from(self.count(severity)) * 100.0 / f64::from(self.total_issues);
        pct.round() as u32
    }

    /// Counts that overflow `u32` when summed are inconsistent, not a crash.
    pub fn is_consistent(&self) -> bool {
        self.errors
            .checked_add(self.warnings)
            .and_then(|n| n.checked_add(self.infos))
            == Some(self.total_issues)
    }
}

/// Finalized analysis result for one submission. Issue order is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub submission_id: String,
    pub language: Language,
    pub calculated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn is_consistent(&self) -> bool {
        self.summary.is_consistent() && self.summary.total_issues as usize == self.issues.len()
    }
}

/// Row of the report listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDigest {
    pub submission_id: String,
    pub language: Language,
    pub errors: u32,
    pub warnings: u32,
    pub infos: u32,
    pub code_quality_score: f64,
    pub grade: Grade,
    pub calculated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(errors: u32, warnings: u32, infos: u32, total: u32) -> ReportSummary {
        ReportSummary {
            errors,
            warnings,
            infos,
            total_issues: total,
            quality_score: QualityScore::Number(80.0),
            grade: Grade::B,
            evaluation_key: "good".to_string(),
        }
    }

    #[test]
    fn only_python_is_enabled() {
        let enabled: Vec<_> = Language::options()
            .into_iter()
            .filter(|o| o.enabled)
            .map(|o| o.language)
            .collect();
        assert_eq!(enabled, vec![Language::Python]);
        assert_eq!(Language::options().len(), 5);
    }

    #[test]
    fn language_tags_parse_case_insensitively() {
        assert_eq!(Language::from_tag("Python"), Some(Language::Python));
        assert_eq!(Language::from_tag("csharp"), Some(Language::CSharp));
        assert_eq!(Language::from_tag("rust"), None);
    }

    #[test]
    fn share_guards_zero_total() {
        let s = summary(0, 0, 0, 0);
        assert_eq!(s.share(Severity::Error), 0);
        assert!(s.is_consistent());
    }

    #[test]
    fn share_rounds_percentages() {
        let s = summary(2, 1, 0, 3);
        assert_eq!(s.share(Severity::Error), 67);
        assert_eq!(s.share(Severity::Warning), 33);
        assert_eq!(s.share(Severity::Info), 0);
    }

    #[test]
    fn inconsistent_totals_are_detected() {
        assert!(!summary(2, 1, 0, 4).is_consistent());
    }

    #[test]
    fn overflowing_counts_are_inconsistent() {
        assert!(!summary(u32::MAX, 1, 0, 0).is_consistent());
        assert!(!summary(u32::MAX, 0, 1, u32::MAX).is_consistent());
        assert!(summary(u32::MAX, 0, 0, u32::MAX).is_consistent());
    }

    #[test]
    fn source_file_extension_check() {
        let file = SourceFile::new("solution.PY", "print(1)\n");
        assert!(file.has_extension("py"));
        assert!(!SourceFile::new("solution.txt", "x").has_extension("py"));
        assert!(!SourceFile::new("Makefile", "x").has_extension("py"));
    }

    #[test]
    fn report_deserializes_from_wire_shape() {
        let json = r#"{
            "submissionId": "abc123",
            "language": "python",
            "calculatedAt": "2024-05-01T10:00:00Z",
            "summary": {
                "errors": 1, "warnings": 0, "infos": 0, "totalIssues": 1,
                "codeQuality": "90", "grade": "A", "evaluation": "excellent"
            },
            "issues": [
                {"code": "E0602", "message": "Undefined name", "line": 3, "column": 1, "severity": "error"}
            ]
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.summary.quality_score.to_string(), "90");
        assert_eq!(report.issues[0].explanation(), "Undefined name");
        assert!(report.issues[0].bad_example.is_empty());
    }

    #[test]
    fn numeric_quality_score_displays_without_fraction() {
        assert_eq!(QualityScore::Number(72.0).to_string(), "72");
        assert_eq!(QualityScore::Number(72.5).to_string(), "72.5");
    }
}
