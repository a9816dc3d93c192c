//! reqwest-backed implementation of `AnalysisGateway`.

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::document::ResumeFile;
use crate::errors::RemoteError;
use crate::gateway::{AnalysisGateway, MatchRequest};
use crate::models::{ApiEnvelope, ApiErrorBody, CandidateMatch, JobMatchResult, ResumeData};

const GENERIC_ERROR: &str = "An error occurred";
const UPLOAD_FAILED: &str = "Failed to upload resume";
const MATCH_FAILED: &str = "Failed to match job";
const RESUME_NOT_FOUND: &str = "Resume not found";
const LIST_FAILED: &str = "Failed to load resumes";
const CANDIDATES_FAILED: &str = "Failed to find candidates";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindCandidatesRequest<'a> {
    job_description: &'a str,
    top_k: u32,
}

/// Error half of an envelope, decoded from non-2xx bodies where `data` may
/// not match the expected payload type.
#[derive(Debug, Deserialize)]
struct ErrorOnly {
    error: Option<ApiErrorBody>,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl AnalysisGateway for HttpGateway {
    async fn upload_resume(&self, file: &ResumeFile) -> Result<ResumeData, RemoteError> {
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(transport_error)?;
        let form = multipart::Form::new().part("file", part);

        debug!(
            "Uploading resume '{}' ({} bytes)",
            file.file_name,
            file.size()
        );

        let sent = self
            .client
            .post(self.url("resumes/upload"))
            .multipart(form)
            .send()
            .await;

        decode_envelope::<ResumeData>(sent, UPLOAD_FAILED)
            .await?
            .into_result(UPLOAD_FAILED)
    }

    async fn match_job(&self, request: &MatchRequest) -> Result<JobMatchResult, RemoteError> {
        debug!(
            "Matching resume {} against '{}'",
            request.resume_id, request.job_title
        );

        let sent = self
            .client
            .post(self.url("jobs/match"))
            .json(request)
            .send()
            .await;

        decode_envelope::<JobMatchResult>(sent, MATCH_FAILED)
            .await?
            .into_result(MATCH_FAILED)
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeData>, RemoteError> {
        let sent = self.client.get(self.url("resumes")).send().await;
        let envelope = decode_envelope::<Vec<ResumeData>>(sent, LIST_FAILED).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn get_resume(&self, id: &str) -> Result<ResumeData, RemoteError> {
        let sent = self
            .client
            .get(self.url(&format!("resumes/{id}")))
            .send()
            .await;

        decode_envelope::<ResumeData>(sent, RESUME_NOT_FOUND)
            .await?
            .into_result(RESUME_NOT_FOUND)
    }

    async fn delete_resume(&self, id: &str) -> Result<(), RemoteError> {
        let sent = self
            .client
            .delete(self.url(&format!("resumes/{id}")))
            .send()
            .await;

        check_status(sent).await.map(|_| ())
    }

    async fn find_candidates(
        &self,
        job_description: &str,
        top_k: u32,
    ) -> Result<Vec<CandidateMatch>, RemoteError> {
        let body = FindCandidatesRequest {
            job_description,
            top_k,
        };
        let sent = self
            .client
            .post(self.url("jobs/find-candidates"))
            .json(&body)
            .send()
            .await;

        let envelope = decode_envelope::<Vec<CandidateMatch>>(sent, CANDIDATES_FAILED).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// Fails on transport errors and non-2xx statuses. For an error status the
/// body's envelope message is preferred over the transport text.
async fn check_status(sent: reqwest::Result<Response>) -> Result<Response, RemoteError> {
    let response = sent.map_err(transport_error)?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let transport_text = response
        .error_for_status_ref()
        .err()
        .map(|e| e.to_string())
        .unwrap_or_else(|| format!("HTTP status {status}"));

    let body = response.text().await.unwrap_or_default();
    warn!("Analysis service returned {}: {}", status, body);

    let error = serde_json::from_str::<ErrorOnly>(&body)
        .ok()
        .and_then(|e| e.error)
        .map(RemoteError::from)
        .unwrap_or_else(|| non_empty(transport_text));

    Err(error)
}

/// A 2xx body that is not an envelope counts as an unsuccessful envelope,
/// so the operation's `fallback` message is reported.
async fn decode_envelope<T: DeserializeOwned>(
    sent: reqwest::Result<Response>,
    fallback: &str,
) -> Result<ApiEnvelope<T>, RemoteError> {
    let response = check_status(sent).await?;
    let body = response.text().await.map_err(transport_error)?;

    serde_json::from_str::<ApiEnvelope<T>>(&body).map_err(|e| {
        warn!("Analysis service sent an unreadable envelope: {e}");
        RemoteError::new(fallback)
    })
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    warn!("Analysis service transport error: {e}");
    non_empty(e.to_string())
}

fn non_empty(message: String) -> RemoteError {
    if message.trim().is_empty() {
        RemoteError::new(GENERIC_ERROR)
    } else {
        RemoteError::new(message)
    }
}
