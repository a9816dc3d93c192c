//! Service Gateway: typed access to the remote analysis service.
//!
//! Every response is wrapped in an envelope `{success, data?, error?}`. The
//! gateway's only job is turning that envelope into a plain value or a
//! `RemoteError`. No retries, no caching, no rate limiting.
//!
//! Orchestrators hold the gateway as `Arc<dyn AnalysisGateway>`, so tests can
//! swap in a scripted implementation.

use async_trait::async_trait;
use serde::Serialize;

use crate::document::ResumeFile;
use crate::errors::RemoteError;
use crate::models::{CandidateMatch, JobMatchResult, ResumeData};

pub mod http;

pub use http::HttpGateway;

pub const DEFAULT_TOP_K: u32 = 5;

/// Body of `POST /jobs/match`. `company` is left out entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub resume_id: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// `POST /resumes/upload` as a single-part multipart body (field `file`).
    async fn upload_resume(&self, file: &ResumeFile) -> Result<ResumeData, RemoteError>;

    /// `POST /jobs/match`
    async fn match_job(&self, request: &MatchRequest) -> Result<JobMatchResult, RemoteError>;

    /// `GET /resumes`
    async fn list_resumes(&self) -> Result<Vec<ResumeData>, RemoteError>;

    /// `GET /resumes/{id}`
    async fn get_resume(&self, id: &str) -> Result<ResumeData, RemoteError>;

    /// `DELETE /resumes/{id}`
    async fn delete_resume(&self, id: &str) -> Result<(), RemoteError>;

    /// `POST /jobs/find-candidates`
    async fn find_candidates(
        &self,
        job_description: &str,
        top_k: u32,
    ) -> Result<Vec<CandidateMatch>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(company: Option<&str>) -> MatchRequest {
        MatchRequest {
            resume_id: "r-1".to_string(),
            job_title: "Platform Engineer".to_string(),
            job_description: "Build and run the platform.".to_string(),
            company: company.map(str::to_string),
        }
    }

    #[test]
    fn test_match_request_omits_absent_company() {
        let value = serde_json::to_value(request(None)).unwrap();
        assert!(value.get("company").is_none());
        assert_eq!(value["resumeId"], "r-1");
        assert_eq!(value["jobTitle"], "Platform Engineer");
    }

    #[test]
    fn test_match_request_includes_present_company() {
        let value = serde_json::to_value(request(Some("Acme"))).unwrap();
        assert_eq!(value["company"], "Acme");
    }
}
