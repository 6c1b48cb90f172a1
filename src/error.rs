use std::path::PathBuf;

use voxa_core::DbError;

/// Every failure a command can report. All of them end the process with a non-zero code.
#[derive(Debug, thiserror::Error)]
pub enum VoxaError {
    #[error("configuration not found at {}: {reason} (run `voxa init` first)", path.display())]
    ConfigNotFound { path: PathBuf, reason: String },

    #[error("request failed: {message}")]
    RequestFailed {
        message: String,
        status: Option<u16>,
        body: Option<serde_json::Value>,
    },

    #[error(transparent)]
    QueryFailed(#[from] DbError),

    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid input: {0}")]
    ValidationError(String),

    #[error("setup failed: {0:#}")]
    Provision(anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VoxaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

pub type Result<T> = std::result::Result<T, VoxaError>;
