// Pulse Error Types
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PulseResult<T> = Result<T, PulseError>;

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("GitHub API error: {status} ({endpoint})")]
    Transport { status: u16, endpoint: String },

    #[error("Request to {endpoint} timed out after {secs}s")]
    Timeout { endpoint: String, secs: u64 },

    #[error("Aggregate failure: {0}")]
    Aggregate(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseErrorResponse {
    pub code: u16,
    pub message: String,
}

impl PulseError {
    /// Whether the failure came from talking to the upstream rather than from our own input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PulseError::Transport { .. } | PulseError::Timeout { .. } | PulseError::Http(_)
        )
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PulseError::InvalidArguments(_) => 400,
            PulseError::NotFound(_) => 404,
            PulseError::Transport { .. }
            | PulseError::Timeout { .. }
            | PulseError::Aggregate(_)
            | PulseError::Http(_) => 502,
            PulseError::Json(_) => 500,
        }
    }

    pub fn to_error_response(&self) -> PulseErrorResponse {
        PulseErrorResponse {
            code: self.http_status(),
            message: self.to_string(),
        }
    }
}
