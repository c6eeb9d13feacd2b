use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the recipe service on non-success responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Extracts the `error` field from a raw response body, if any.
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.error)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}

/// Failure reported by the remote service or the path to it.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("service returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: u16,
        message: Option<String>,
    },
    /// The service could not be reached or the response could not be read.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Message supplied by the service, when it sent one.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ServiceError::Status { message, .. } => message.as_deref(),
            ServiceError::Transport(_) | ServiceError::Decode(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
