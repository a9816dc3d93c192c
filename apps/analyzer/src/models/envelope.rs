use serde::{Deserialize, Serialize};

use crate::errors::RemoteError;

/// `{success, data?, error?}` wrapper carried by every service response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload only when `success` is true and `data` is present.
    /// Otherwise the envelope's own error message wins, then `fallback`.
    pub fn into_result(self, fallback: &str) -> Result<T, RemoteError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .map(RemoteError::from)
                .unwrap_or_else(|| RemoteError::new(fallback))),
        }
    }
}

impl From<ApiErrorBody> for RemoteError {
    fn from(body: ApiErrorBody) -> Self {
        RemoteError {
            message: body.message,
            code: body.code,
        }
    }
}
