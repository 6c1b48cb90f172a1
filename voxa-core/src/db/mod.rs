//! SQLite-backed entity repository.
//!
//! Every public operation runs under a deadline. Single-row reads and writes
//! get [`ROW_TIMEOUT`]; the report and the wider inserts get [`REPORT_TIMEOUT`].
//! A statement still running at its deadline is interrupted and reported as
//! [`DbError::Timeout`].

mod comments;
mod report;
pub mod schema;
mod sprints;
mod stories;
mod tasks;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rusqlite::{Connection, ErrorCode};

use crate::error::{DbError, Result};

pub const ROW_TIMEOUT: Duration = Duration::from_secs(10);
pub const REPORT_TIMEOUT: Duration = Duration::from_secs(15);

/// VM instructions between deadline checks.
const PROGRESS_INTERVAL: i32 = 1_000;

/// Connection settings read from `DB_HOST`, `DB_USER`, `DB_PASSWORD` and `DB_DATABASE`.
///
/// The store is a SQLite file: `database` names the file and `host`, when set,
/// is the directory holding it. `user` and `password` are carried for
/// compatibility with shared environment files; SQLite has no accounts.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (used by tests instead of the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: read("DB_HOST"),
            user: read("DB_USER"),
            password: read("DB_PASSWORD"),
            database: read("DB_DATABASE"),
        }
    }

    /// Resolve the database file, failing if `DB_DATABASE` was never set.
    pub fn database_path(&self) -> Result<PathBuf> {
        let database = self.database.as_deref().ok_or(DbError::NotConfigured)?;
        Ok(match self.host.as_deref() {
            Some(host) => Path::new(host).join(database),
            None => PathBuf::from(database),
        })
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

/// Shared handle to the store. Clones share one connection for the life of the process.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database described by the environment-derived config.
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let path = config.database_path()?;
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DbError::query("enable foreign keys", e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create any missing tables. Safe to run on every start.
    pub fn migrate(&self) -> Result<()> {
        self.run("migrate", ROW_TIMEOUT, |conn| {
            conn.execute_batch(schema::SCHEMA)
        })
    }

    /// Run `f` against the connection with `timeout` as a hard deadline.
    fn run<T>(
        &self,
        operation: &'static str,
        timeout: Duration,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let guard = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let conn: &Connection = &guard;

        conn.busy_timeout(timeout)
            .map_err(|e| DbError::query(operation, e))?;
        let deadline = Instant::now() + timeout;
        conn.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));

        let result = f(conn);
        conn.progress_handler(PROGRESS_INTERVAL, None::<fn() -> bool>);

        result.map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted) | Some(ErrorCode::DatabaseBusy) => {
                tracing::warn!(operation, timeout_secs = timeout.as_secs(), "query timed out");
                DbError::Timeout {
                    operation,
                    after: timeout,
                }
            }
            _ => DbError::query(operation, e),
        })
    }
}
