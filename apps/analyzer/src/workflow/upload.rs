//! Upload Orchestrator: file selection → submit → progress ramp → store update.
//!
//! ```text
//! Idle ──select──▶ FileSelected ──submit──▶ Uploading ──ok──▶ Analyzed
//!   ▲                 │    ▲                    │                 │
//!   └────remove───────┘    └───────error────────┘                 │
//!   ▲                                                             │
//!   └─────────────────────────────remove──────────────────────────┘
//! ```
//!
//! Every submit takes a generation number. Selecting or removing a file
//! moves the generation on, and a response carrying an old generation is
//! dropped without touching the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::document::ResumeFile;
use crate::errors::{Phase, ValidationError, WorkflowError};
use crate::gateway::AnalysisGateway;
use crate::models::ResumeData;
use crate::store::WorkflowStore;
use crate::workflow::progress::ProgressRamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Analyzed,
}

#[derive(Default)]
struct UploadSlot {
    state: UploadState,
    selected: Option<ResumeFile>,
    generation: u64,
    ramp: Option<ProgressRamp>,
}

pub struct UploadOrchestrator {
    store: WorkflowStore,
    gateway: Arc<dyn AnalysisGateway>,
    slot: Mutex<UploadSlot>,
}

impl UploadOrchestrator {
    pub fn new(store: WorkflowStore, gateway: Arc<dyn AnalysisGateway>) -> Self {
        Self {
            store,
            gateway,
            slot: Mutex::new(UploadSlot::default()),
        }
    }

    pub fn state(&self) -> UploadState {
        self.slot().state
    }

    pub fn selected_file(&self) -> Option<ResumeFile> {
        self.slot().selected.clone()
    }

    /// Accepts a new file, discarding any prior analysis before anything is
    /// sent. A rejected file leaves the workflow untouched.
    pub fn select_file(&self, file: ResumeFile) -> Result<(), ValidationError> {
        file.check_acceptable()?;

        info!(
            "Selected resume '{}' ({}, {} bytes)",
            file.file_name,
            file.content_type,
            file.size()
        );

        {
            let mut slot = self.slot();
            self.abandon_in_flight(&mut slot);
            slot.selected = Some(file);
            slot.state = UploadState::FileSelected;
        }
        self.store.set_current_resume(None);
        Ok(())
    }

    /// Clears the selected file, the résumé and the match. Safe to repeat.
    pub fn remove(&self) {
        {
            let mut slot = self.slot();
            self.abandon_in_flight(&mut slot);
            slot.selected = None;
            slot.state = UploadState::Idle;
        }
        self.store.set_current_resume(None);
    }

    /// Sends the selected file for analysis. Only valid from `FileSelected`,
    /// and never while a match is running.
    ///
    /// On failure the file stays selected so the user can retry. Dropping the
    /// returned future mid-request returns the slot to `FileSelected`.
    pub async fn submit(&self) -> Result<ResumeData, WorkflowError> {
        let (file, generation) = {
            let mut slot = self.slot();
            match slot.state {
                UploadState::FileSelected => {}
                UploadState::Idle => return Err(ValidationError::NoFileSelected.into()),
                UploadState::Uploading => return Err(ValidationError::UploadInProgress.into()),
                UploadState::Analyzed => return Err(ValidationError::AlreadyAnalyzed.into()),
            }
            if self.store.is_matching() {
                return Err(ValidationError::MatchInProgress.into());
            }
            let file = slot
                .selected
                .clone()
                .ok_or(ValidationError::NoFileSelected)?;

            self.abandon_in_flight(&mut slot);
            slot.state = UploadState::Uploading;
            self.store.set_uploading(true);
            self.store.set_upload_progress(0);
            slot.ramp = Some(ProgressRamp::start(self.store.clone()));
            (file, slot.generation)
        };

        let in_flight = InFlight {
            uploads: self,
            generation,
            finished: false,
        };
        info!("Uploading '{}' for analysis", file.file_name);
        let result = self.gateway.upload_resume(&file).await;
        in_flight.finish();

        let mut slot = self.slot();
        if slot.generation != generation {
            debug!(
                "Discarding upload response for '{}' (generation {generation}, now {})",
                file.file_name, slot.generation
            );
            return Err(WorkflowError::Superseded(Phase::Upload));
        }

        // Stop the ramp before the final progress values are written.
        slot.ramp = None;

        match result {
            Ok(resume) => {
                self.store.set_upload_progress(100);
                self.store.set_current_resume(Some(resume.clone()));
                self.store.set_uploading(false);
                self.store.set_upload_progress(0);
                slot.state = UploadState::Analyzed;
                info!(
                    "Resume '{}' analyzed as {} ({} skills)",
                    resume.file_name,
                    resume.id,
                    resume.extracted_skills.total_skills()
                );
                Ok(resume)
            }
            Err(e) => {
                warn!("Resume analysis failed for '{}': {e}", file.file_name);
                self.store.set_uploading(false);
                self.store.set_upload_progress(0);
                slot.state = UploadState::FileSelected;
                Err(e.into())
            }
        }
    }

    /// Moves the generation on so any in-flight response is ignored, and
    /// clears the store's upload indicators if an upload was running.
    fn abandon_in_flight(&self, slot: &mut UploadSlot) {
        slot.generation += 1;
        if slot.ramp.take().is_some() {
            self.store.set_uploading(false);
            self.store.set_upload_progress(0);
        }
    }

    fn slot(&self) -> MutexGuard<'_, UploadSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Undoes the uploading state if `submit` is dropped before the gateway
/// call returns.
struct InFlight<'a> {
    uploads: &'a UploadOrchestrator,
    generation: u64,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut slot = self.uploads.slot();
        if slot.generation != self.generation {
            return;
        }
        debug!("Upload abandoned before a response (generation {})", self.generation);
        self.uploads.abandon_in_flight(&mut slot);
        slot.state = if slot.selected.is_some() {
            UploadState::FileSelected
        } else {
            UploadState::Idle
        };
    }
}
