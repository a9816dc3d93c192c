//! Résumé file intake: what a selected file carries and which files are accepted.

use std::path::Path;

use bytes::Bytes;

use crate::errors::ValidationError;

/// 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted content types: PDF, DOCX, plain text.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// A résumé file chosen by the user, held in memory until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    /// Builds a file from raw bytes, guessing the content type from the name.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Checks type first, then size.
    pub fn check_acceptable(&self) -> Result<(), ValidationError> {
        if !ACCEPTED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(ValidationError::UnsupportedFileType {
                file_name: self.file_name.clone(),
            });
        }
        if self.size() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::FileTooLarge {
                size: self.size(),
                max: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}
