//! Error type returned by every fallible explorer operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The request never produced an HTTP response (DNS, connect, timeout…).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    Decode(String),

    #[error("no world loaded")]
    NoWorld,

    #[error("still exploring; wait for the current move to finish")]
    Locked,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("element '{0}' is not interactive")]
    NotInteractive(String),

    #[error("unknown element '{0}'")]
    UnknownElement(String),

    #[error("invalid direction '{0}' (expected forward, backward, left or right)")]
    InvalidDirection(String),

    /// A background task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl ExplorerError {
    /// True for failures caused by the remote side or the network, as
    /// opposed to a guard rejecting the command locally.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ExplorerError::Transport(_) | ExplorerError::Status { .. } | ExplorerError::Decode(_)
        )
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(e: serde_json::Error) -> Self {
        ExplorerError::Decode(e.to_string())
    }
}
