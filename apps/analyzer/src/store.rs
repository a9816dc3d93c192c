//! Workflow Store: the single source of truth for the analysis workflow.
//!
//! An explicit, cloneable handle. Each orchestrator gets one injected; clones
//! share the same state. Every setter is atomic and publishes a `StoreEvent`
//! when it changes something. Setting a match always counts as a change.
//!
//! The résumé/match pairing is structural: replacing the résumé with a
//! different one clears the match in the same step, and a match is only
//! accepted for the résumé currently held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::errors::StoreError;
use crate::models::{JobMatchResult, ResumeData};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub current_resume: Option<ResumeData>,
    pub current_match: Option<JobMatchResult>,
    pub is_uploading: bool,
    pub is_matching: bool,
    /// 0 – 100. Only meaningful while `is_uploading` is true.
    pub upload_progress: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ResumeChanged,
    MatchChanged,
    UploadingChanged(bool),
    MatchingChanged(bool),
    ProgressChanged(u8),
    Reset,
}

#[derive(Clone)]
pub struct WorkflowStore {
    state: Arc<Mutex<WorkflowState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(WorkflowState::default())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.lock().clone()
    }

    pub fn current_resume(&self) -> Option<ResumeData> {
        self.lock().current_resume.clone()
    }

    pub fn current_resume_id(&self) -> Option<String> {
        self.lock().current_resume.as_ref().map(|r| r.id.clone())
    }

    pub fn current_match(&self) -> Option<JobMatchResult> {
        self.lock().current_match.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.lock().is_uploading
    }

    pub fn is_matching(&self) -> bool {
        self.lock().is_matching
    }

    pub fn upload_progress(&self) -> u8 {
        self.lock().upload_progress
    }

    /// Progress to display, or `None` when no upload is running.
    pub fn visible_progress(&self) -> Option<u8> {
        let state = self.lock();
        state.is_uploading.then_some(state.upload_progress)
    }

    /// Replaces the résumé. A different résumé (or none) also clears the match.
    pub fn set_current_resume(&self, resume: Option<ResumeData>) {
        let mut events = Vec::new();
        {
            let mut state = self.lock();
            if state.current_resume == resume {
                return;
            }
            let same_identity = match (&state.current_resume, &resume) {
                (Some(old), Some(new)) => old.id == new.id,
                _ => false,
            };
            state.current_resume = resume;
            events.push(StoreEvent::ResumeChanged);

            if !same_identity && state.current_match.take().is_some() {
                events.push(StoreEvent::MatchChanged);
            }
        }
        self.publish(events);
    }

    /// Sets or clears the match. A match must belong to the current résumé.
    pub fn set_current_match(&self, job_match: Option<JobMatchResult>) -> Result<(), StoreError> {
        {
            let mut state = self.lock();
            if let Some(m) = &job_match {
                let current_id = state.current_resume.as_ref().map(|r| r.id.as_str());
                if current_id != Some(m.resume_id.as_str()) {
                    return Err(StoreError::ResumeMismatch {
                        expected: current_id.map(str::to_string),
                        actual: m.resume_id.clone(),
                    });
                }
            }
            // Re-setting an equal match still counts as a new arrival.
            if job_match.is_none() && state.current_match.is_none() {
                return Ok(());
            }
            state.current_match = job_match;
        }
        self.publish([StoreEvent::MatchChanged]);
        Ok(())
    }

    pub fn set_uploading(&self, uploading: bool) {
        if self.swap(|s| std::mem::replace(&mut s.is_uploading, uploading)) != uploading {
            self.publish([StoreEvent::UploadingChanged(uploading)]);
        }
    }

    pub fn set_matching(&self, matching: bool) {
        if self.swap(|s| std::mem::replace(&mut s.is_matching, matching)) != matching {
            self.publish([StoreEvent::MatchingChanged(matching)]);
        }
    }

    /// Values above 100 are clamped.
    pub fn set_upload_progress(&self, progress: u8) {
        self.update_upload_progress(|_| progress);
    }

    /// Read-modify-write of the progress under a single lock.
    pub fn update_upload_progress(&self, f: impl FnOnce(u8) -> u8) {
        let (old, new) = self.swap(|s| {
            let old = s.upload_progress;
            s.upload_progress = f(old).min(100);
            (old, s.upload_progress)
        });
        if old != new {
            self.publish([StoreEvent::ProgressChanged(new)]);
        }
    }

    /// Advances progress by `step`, capped at `ceiling`. No-op while no upload
    /// is running or once progress has reached `ceiling`.
    pub fn advance_upload_progress(&self, step: u8, ceiling: u8) {
        let advanced = self.swap(|s| {
            if !s.is_uploading || s.upload_progress >= ceiling {
                return None;
            }
            s.upload_progress = s.upload_progress.saturating_add(step).min(ceiling);
            Some(s.upload_progress)
        });
        if let Some(progress) = advanced {
            self.publish([StoreEvent::ProgressChanged(progress)]);
        }
    }

    /// Restores all five fields to their initial values.
    pub fn reset(&self) {
        let changed = self.swap(|s| {
            let changed = *s != WorkflowState::default();
            *s = WorkflowState::default();
            changed
        });
        if changed {
            self.publish([StoreEvent::Reset]);
        }
    }

    fn swap<R>(&self, f: impl FnOnce(&mut WorkflowState) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: impl IntoIterator<Item = StoreEvent>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }
}
