//! Error types for the Loki client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while pushing logs to Loki
#[derive(Debug, Error)]
pub enum ClientError {
    /// The push payload could not be encoded
    #[error("failed to marshal JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request never produced a response (refused, DNS, timeout, ...)
    #[error("failed to send to Loki: {0}")]
    Transport(#[from] reqwest::Error),

    /// Loki answered with something other than 204 No Content
    #[error("Loki returned status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Full response body, kept verbatim for diagnosis
        body: String,
    },
}

impl ClientError {
    /// Create a rejection error from status code and response body
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// Status code of a rejected push
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the push failed at the network level
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the push was abandoned because the client timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
