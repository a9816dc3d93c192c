//! Fixtures and a scripted gateway shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::document::ResumeFile;
use crate::errors::RemoteError;
use crate::gateway::{AnalysisGateway, MatchRequest};
use crate::models::{CandidateMatch, ExtractedSkills, JobMatchResult, ResumeData, SkillGap};

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn resume(id: &str) -> ResumeData {
    ResumeData {
        id: id.to_string(),
        file_name: format!("{id}.pdf"),
        extracted_skills: ExtractedSkills {
            technical_skills: strings(&["Go", "SQL"]),
            ..Default::default()
        },
        vector_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub(crate) fn job_match_for(resume_id: &str) -> JobMatchResult {
    JobMatchResult {
        id: format!("m-{resume_id}"),
        resume_id: resume_id.to_string(),
        job_id: "j-1".to_string(),
        job_title: "Platform Engineer".to_string(),
        similarity_score: 72,
        skill_gaps: SkillGap {
            matched: strings(&["Go"]),
            partial: strings(&["SQL"]),
            missing: strings(&["Kubernetes"]),
        },
        matched_skills: strings(&["Go"]),
        interview_questions: strings(&[
            "How would you migrate a service to Kubernetes?",
            "Describe a SQL query you optimized.",
        ]),
        recommendations: strings(&["Get hands-on with Kubernetes."]),
    }
}

pub(crate) fn pdf(name: &str) -> ResumeFile {
    ResumeFile::new(name, b"%PDF-1.4 fake resume".to_vec())
}

enum Release {
    After(Duration),
    On(Arc<Notify>),
}

struct Scripted<T> {
    result: Result<T, RemoteError>,
    release: Release,
}

/// Gateway that replays queued responses, each released after a delay or
/// when its gate is notified. Records every call it receives.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    uploads: Mutex<VecDeque<Scripted<ResumeData>>>,
    matches: Mutex<VecDeque<Scripted<JobMatchResult>>>,
    upload_calls: AtomicUsize,
    match_requests: Mutex<Vec<MatchRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_upload(&self, result: Result<ResumeData, RemoteError>, delay: Duration) {
        self.uploads.lock().unwrap().push_back(Scripted {
            result,
            release: Release::After(delay),
        });
    }

    pub(crate) fn push_upload_gated(&self, result: Result<ResumeData, RemoteError>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.uploads.lock().unwrap().push_back(Scripted {
            result,
            release: Release::On(gate.clone()),
        });
        gate
    }

    pub(crate) fn push_match(&self, result: Result<JobMatchResult, RemoteError>) {
        self.matches.lock().unwrap().push_back(Scripted {
            result,
            release: Release::After(Duration::ZERO),
        });
    }

    pub(crate) fn push_match_gated(
        &self,
        result: Result<JobMatchResult, RemoteError>,
    ) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.matches.lock().unwrap().push_back(Scripted {
            result,
            release: Release::On(gate.clone()),
        });
        gate
    }

    pub(crate) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn match_requests(&self) -> Vec<MatchRequest> {
        self.match_requests.lock().unwrap().clone()
    }

    async fn replay<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Result<T, RemoteError> {
        let next = queue.lock().unwrap().pop_front();
        let Some(scripted) = next else {
            return Err(RemoteError::new("no scripted response"));
        };
        match scripted.release {
            Release::After(delay) => tokio::time::sleep(delay).await,
            Release::On(gate) => gate.notified().await,
        }
        scripted.result
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedGateway {
    async fn upload_resume(&self, _file: &ResumeFile) -> Result<ResumeData, RemoteError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        Self::replay(&self.uploads).await
    }

    async fn match_job(&self, request: &MatchRequest) -> Result<JobMatchResult, RemoteError> {
        self.match_requests.lock().unwrap().push(request.clone());
        Self::replay(&self.matches).await
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeData>, RemoteError> {
        Ok(Vec::new())
    }

    async fn get_resume(&self, id: &str) -> Result<ResumeData, RemoteError> {
        Ok(resume(id))
    }

    async fn delete_resume(&self, _id: &str) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn find_candidates(
        &self,
        _job_description: &str,
        _top_k: u32,
    ) -> Result<Vec<CandidateMatch>, RemoteError> {
        Ok(Vec::new())
    }
}
