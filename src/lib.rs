//! voxa: persisted HTTP client configuration, ad-hoc requests and sprint
//! tracking, plus local scaffolding and synthetic data helpers.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod output;
pub mod prompt;
pub mod provision;
pub mod seed;

pub use error::{Result, VoxaError};
