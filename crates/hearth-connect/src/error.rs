//! Error type for the external-service clients.

use thiserror::Error;

/// Errors from talking to the chat platform or the automation backend.
///
/// Every variant is recovered at the component that made the call and
/// surfaced to the user as a generic failure message; none of them crosses
/// into the confirmation registry's invariants.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Unexpected status code: {0}")]
    Status(u16),
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ConnectError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConnectError::Decode(err.to_string())
        } else {
            ConnectError::Transport(err.to_string())
        }
    }
}

impl From<ConnectError> for hearth_core::HearthError {
    fn from(err: ConnectError) -> Self {
        hearth_core::HearthError::Backend(err.to_string())
    }
}
