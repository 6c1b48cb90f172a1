use std::path::PathBuf;
use std::time::Duration;

/// Failures raised by the entity repository.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database is not configured: set DB_DATABASE (and optionally DB_HOST)")]
    NotConfigured,

    #[error("failed to open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl DbError {
    pub(crate) fn query(operation: &'static str, source: rusqlite::Error) -> Self {
        Self::Query { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
