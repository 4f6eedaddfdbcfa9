use thiserror::Error;

use crate::app::BuildError;

/// Errors from the plumbing around upload tasks (config, runner, client setup).
///
/// Upload failures themselves are not errors here: they reach the caller
/// through the completion callback as [`crate::domain::UploadError`].
#[derive(Debug, Error)]
pub enum CourierError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("runner is shut down; task rejected")]
    RunnerClosed,

    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}
