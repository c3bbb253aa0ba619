//! Error types for remote node queries

use thiserror::Error;

/// Result type for remote node queries
pub type RemoteResult<T> = Result<T, RemoteQueryError>;

/// Errors that can occur while querying the remote node
#[derive(Error, Debug)]
pub enum RemoteQueryError {
    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a non-success status
    #[error("Node returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Expected key absent from an otherwise valid response
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// Node address does not form a usable URL
    #[error("Invalid node address: {0}")]
    InvalidAddress(String),
}

impl From<reqwest::Error> for RemoteQueryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RemoteQueryError::Malformed(error.to_string())
        } else {
            RemoteQueryError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteQueryError {
    fn from(error: serde_json::Error) -> Self {
        RemoteQueryError::Malformed(error.to_string())
    }
}
