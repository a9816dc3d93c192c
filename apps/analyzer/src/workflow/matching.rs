//! Match Orchestrator: form validation → submit → result ingestion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{Phase, RemoteError, ValidationError, WorkflowError};
use crate::gateway::{AnalysisGateway, MatchRequest};
use crate::models::JobMatchResult;
use crate::store::WorkflowStore;

/// Minimum job description length, in characters, after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

const MISMATCHED_RESULT: &str = "Match result does not belong to the selected resume";

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchForm {
    pub job_title: String,
    pub job_description: String,
    /// Optional; blank means "not given".
    pub company: String,
}

impl MatchForm {
    /// Trims and validates the form into a request for `resume_id`.
    pub fn to_request(&self, resume_id: &str) -> Result<MatchRequest, ValidationError> {
        let job_title = self.job_title.trim();
        if job_title.is_empty() {
            return Err(ValidationError::BlankJobTitle);
        }

        let job_description = self.job_description.trim();
        let length = job_description.chars().count();
        if length < MIN_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooShort {
                min: MIN_DESCRIPTION_CHARS,
                actual: length,
            });
        }

        let company = Some(self.company.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(MatchRequest {
            resume_id: resume_id.to_string(),
            job_title: job_title.to_string(),
            job_description: job_description.to_string(),
            company,
        })
    }
}

pub struct MatchOrchestrator {
    store: WorkflowStore,
    gateway: Arc<dyn AnalysisGateway>,
    generation: AtomicU64,
}

impl MatchOrchestrator {
    pub fn new(store: WorkflowStore, gateway: Arc<dyn AnalysisGateway>) -> Self {
        Self {
            store,
            gateway,
            generation: AtomicU64::new(0),
        }
    }

    /// Matches the current résumé against the form's job.
    ///
    /// Preconditions are checked in order and fail without a network call.
    /// A failed call leaves any previous match in place. A response is only
    /// applied if no newer submit has started and the résumé it was computed
    /// for is still current.
    pub async fn submit(&self, form: &MatchForm) -> Result<JobMatchResult, WorkflowError> {
        let resume_id = self
            .store
            .current_resume_id()
            .ok_or(ValidationError::MissingResume)?;
        if self.store.is_uploading() {
            return Err(ValidationError::UploadInProgress.into());
        }
        let request = form.to_request(&resume_id)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_matching(true);
        info!(
            "Matching resume {} against '{}'{}",
            request.resume_id,
            request.job_title,
            request
                .company
                .as_deref()
                .map(|c| format!(" at {c}"))
                .unwrap_or_default()
        );

        let result = self.gateway.match_job(&request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            // The newer submit owns the in-progress flag.
            debug!("Discarding match response (generation {generation})");
            return Err(WorkflowError::Superseded(Phase::Match));
        }
        self.store.set_matching(false);

        let job_match = match result {
            Ok(job_match) => job_match,
            Err(e) => {
                warn!("Job match failed: {e}");
                return Err(e.into());
            }
        };

        if self.store.current_resume_id().as_deref() != Some(request.resume_id.as_str()) {
            debug!(
                "Discarding match response: resume {} is no longer current",
                request.resume_id
            );
            return Err(WorkflowError::Superseded(Phase::Match));
        }
        if job_match.resume_id != request.resume_id {
            warn!(
                "Match result names resume {} but was requested for {}",
                job_match.resume_id, request.resume_id
            );
            return Err(RemoteError::new(MISMATCHED_RESULT).into());
        }

        // The résumé can still change between the check above and this call.
        if let Err(e) = self.store.set_current_match(Some(job_match.clone())) {
            debug!("Discarding match response: {e}");
            return Err(WorkflowError::Superseded(Phase::Match));
        }

        info!(
            "Matched '{}': score {} ({} matched, {} partial, {} missing)",
            job_match.job_title,
            job_match.similarity_score,
            job_match.skill_gaps.matched.len(),
            job_match.skill_gaps.partial.len(),
            job_match.skill_gaps.missing.len()
        );
        Ok(job_match)
    }
}
