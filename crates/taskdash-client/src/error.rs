//! Error types for the dashboard client.

use thiserror::Error;

/// Errors that can occur when talking to the task backend.
///
/// The display text of each variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No token is available for the task. Raised before any request.
    #[error("Task token not available")]
    MissingCredential,

    /// The backend rejected the token (HTTP 401).
    #[error("Unauthorized: Invalid or expired token")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("Request failed: {status} {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No response was received.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Input rejected locally before sending.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token storage failed.
    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Returns true if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }

    /// Returns true if the user must supply a new token to continue.
    pub fn needs_credential(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Unauthorized)
    }
}

/// Errors from token persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
