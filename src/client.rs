use crate::backend::{validate_upload, AnalysisBackend};
use crate::cancel::CancelToken;
use crate::error::{AnalysisError, FetchError, UPLOAD_FALLBACK_MESSAGE};
use crate::poller::{PollPolicy, ReportFetcher, ReportPoller};
use crate::types::{Language, Report, ReportDigest, SourceFile, Submission, UploadReceipt};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5033/api";

const USER_AGENT: &str = concat!("quality-report/", env!("CARGO_PKG_VERSION"));

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Uploads source files and lists finished reports.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(http_client(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Send `file` for analysis. One transfer, no retries.
    ///
    /// An unsupported language or empty file is rejected before any request is made.
    #[instrument(skip(self, file), fields(file = %file.name, %language))]
    pub async fn upload(
        &self,
        file: &SourceFile,
        language: Language,
    ) -> Result<Submission, AnalysisError> {
        validate_upload(file, language)?;

        let form = Form::new().text("language", language.tag()).part(
            "file",
            Part::bytes(file.content.clone()).file_name(file.name.clone()),
        );

        info!(bytes = file.content.len(), "uploading submission");
        let response = self
            .http
            .post(endpoint(&self.base_url, "submissions/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "upload transport failure");
                AnalysisError::upload(UPLOAD_FALLBACK_MESSAGE)
            })?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let outcome = upload_outcome(status, &body);
        match &outcome {
            Ok(submission) => info!(submission_id = %submission.id, "upload accepted"),
            Err(err) => warn!(%status, error = %err, "upload rejected"),
        }
        outcome
    }

    pub async fn list_reports(&self) -> Result<Vec<ReportDigest>, FetchError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, "Reports"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NotReady(status.as_u16()));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// Interpret the upload endpoint's answer. Only `202 Accepted` counts as success.
pub(crate) fn upload_outcome(status: StatusCode, body: &[u8]) -> Result<Submission, AnalysisError> {
    if status == StatusCode::ACCEPTED {
        return serde_json::from_slice::<UploadReceipt>(body)
            .map(Submission::from)
            .map_err(|_| AnalysisError::upload(UPLOAD_FALLBACK_MESSAGE));
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string());
    Err(AnalysisError::upload(message))
}

/// Fetches a single report over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReportFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpReportFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(http_client(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ReportFetcher for HttpReportFetcher {
    async fn fetch_report(&self, submission_id: &str) -> Result<Report, FetchError> {
        let url = endpoint(&self.base_url, &format!("Reports/{}", submission_id));
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "report fetch");
        report_outcome(status, &body)
    }
}

pub(crate) fn report_outcome(status: StatusCode, body: &[u8]) -> Result<Report, FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !status.is_success() {
        return Err(FetchError::NotReady(status.as_u16()));
    }
    serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// The real analysis service: HTTP upload plus HTTP polling.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: SubmissionClient,
    poller: ReportPoller<HttpReportFetcher>,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, policy: PollPolicy) -> Self {
        let base_url = base_url.into();
        let http = http_client();
        Self {
            client: SubmissionClient::with_client(http.clone(), base_url.clone()),
            poller: ReportPoller::new(HttpReportFetcher::with_client(http, base_url), policy),
        }
    }
}

#[async_trait]
impl AnalysisBackend for RemoteBackend {
    async fn upload(
        &self,
        file: &SourceFile,
        language: Language,
    ) -> Result<Submission, AnalysisError> {
        self.client.upload(file, language).await
    }

    async fn poll(
        &self,
        submission_id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Report>, AnalysisError> {
        self.poller.poll(submission_id, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::SubmissionStatus;

    #[test]
    fn accepted_upload_becomes_submission() {
        let body = br#"{"submissionId":"abc123","language":"python","fileName":"solution.py","message":"Accepted"}"#;
        let submission = upload_outcome(StatusCode::ACCEPTED, body).unwrap();
        assert_eq!(submission.id, "abc123");
        assert_eq!(submission.language, Language::Python);
        assert_eq!(submission.file_name, "solution.py");
        assert_eq!(submission.message, "Accepted");
        assert_eq!(submission.status, SubmissionStatus::Accepted);
    }

    #[test]
    fn ok_status_is_not_acceptance() {
        let body = br#"{"submissionId":"abc123","language":"python","fileName":"solution.py","message":"OK"}"#;
        assert!(matches!(
            upload_outcome(StatusCode::OK, body),
            Err(AnalysisError::Upload { .. })
        ));
    }

    #[test]
    fn server_message_is_preferred() {
        let err = upload_outcome(StatusCode::BAD_REQUEST, br#"{"message":"File too large"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "File too large");
    }

    #[test]
    fn missing_message_falls_back() {
        let err = upload_outcome(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>").unwrap_err();
        assert_eq!(err.user_message(), UPLOAD_FALLBACK_MESSAGE);
        let err = upload_outcome(StatusCode::BAD_REQUEST, br#"{"message":"  "}"#).unwrap_err();
        assert_eq!(err.user_message(), UPLOAD_FALLBACK_MESSAGE);
    }

    #[test]
    fn report_statuses_map_to_fetch_errors() {
        assert_eq!(report_outcome(StatusCode::NOT_FOUND, b""), Err(FetchError::NotFound));
        assert_eq!(
            report_outcome(StatusCode::SERVICE_UNAVAILABLE, b""),
            Err(FetchError::NotReady(503))
        );
        assert!(matches!(
            report_outcome(StatusCode::OK, br#"{"submissionId":"abc123"}"#),
            Err(FetchError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_language_never_reaches_the_network() {
        // Port 9 on a reserved address: any real request would fail as an Upload error.
        let client = SubmissionClient::new("http://192.0.2.1:9/api");
        let file = SourceFile::new("solution.py", "print('hi')\n");
        let err = client.upload(&file, Language::Java).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Validation(ValidationError::UnsupportedLanguage(Language::Java))
        );
    }

    #[tokio::test]
    async fn empty_file_is_rejected_locally() {
        let client = SubmissionClient::new("http://192.0.2.1:9/api");
        let err = client
            .upload(&SourceFile::new("solution.py", ""), Language::Python)
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::Validation(ValidationError::EmptyFile));
    }

    #[test]
    fn endpoints_ignore_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:5033/api/", "Reports/abc"),
            "http://localhost:5033/api/Reports/abc"
        );
    }
}
