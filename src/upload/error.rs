use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Raised before any network activity when nothing was picked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{prompt}")]
pub struct NoFileSelected {
    pub prompt: String,
}

/// Anything that went wrong once a submission left the pending state.
/// These are logged and turned into the failure text, never retried.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("malformed confirmation payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to save download: {0}")]
    Save(#[source] io::Error),
}
