use std::fmt;

use thiserror::Error;

/// One of the two workflow stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Upload,
    Match,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::Match => f.write_str("match"),
        }
    }
}

/// Client-detected precondition failures. None of these ever reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a resume first")]
    MissingResume,

    #[error("Please enter a job title")]
    BlankJobTitle,

    #[error("Job description must be at least {min} characters (got {actual})")]
    DescriptionTooShort { min: usize, actual: usize },

    #[error("File is too large ({size} bytes). Maximum size is {max} bytes.")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file type for '{file_name}'. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFileType { file_name: String },

    #[error("No file selected")]
    NoFileSelected,

    #[error("Resume analysis is still running; wait for it to finish before matching")]
    UploadInProgress,

    #[error("Job matching is still running; wait for it to finish before analyzing")]
    MatchInProgress,

    #[error("This resume has already been analyzed. Select a new file to analyze again.")]
    AlreadyAnalyzed,
}

/// A failed remote call. Transport failures and envelope failures are
/// surfaced identically: only `message` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    pub code: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

/// Error type returned by the upload and match orchestrators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The response arrived after a newer action made it irrelevant; it was
    /// dropped without touching the store.
    #[error("{0} response discarded: superseded by a newer action")]
    Superseded(Phase),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Match was computed for resume {actual}, but the current resume is {expected:?}")]
    ResumeMismatch {
        expected: Option<String>,
        actual: String,
    },
}

/// Copy-to-clipboard failures. Cosmetic: they never change workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Failed to copy: {0}")]
    Unavailable(String),

    #[error("No interview question at position {0}")]
    NoSuchQuestion(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message_only() {
        let err = WorkflowError::from(RemoteError::new("resume not found"));
        assert_eq!(err.to_string(), "resume not found");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err = WorkflowError::from(ValidationError::BlankJobTitle);
        assert_eq!(err.to_string(), "Please enter a job title");
    }

    #[test]
    fn test_superseded_names_phase() {
        let err = WorkflowError::Superseded(Phase::Upload);
        assert!(err.to_string().starts_with("upload response discarded"));
    }
}
