//! Core library for voxa.
//!
//! This crate provides the sprint-tracking domain models and the SQLite-backed
//! entity repository, independent of the command-line front end.
//!
//! # Usage
//!
//! ```no_run
//! use voxa_core::db::{Database, DbConfig};
//!
//! let db = Database::connect(&DbConfig::from_env())?;
//! let story = db.create_story("Checkout", "As a shopper I can pay")?;
//! db.add_task(story.id, "Payment form", "Card fields and validation")?;
//!
//! let stories = db.list_stories()?;
//! # Ok::<(), voxa_core::DbError>(())
//! ```

pub mod db;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::DbError;
