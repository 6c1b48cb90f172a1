//! Persisted HTTP client configuration.
//!
//! The file lives at a fixed path in the working directory and is re-read on
//! every request so edits made between invocations are always picked up.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxaError};
use crate::prompt::InitAnswers;

pub const CONFIG_FILE: &str = "voxa.config";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Raw `key:value` strings, kept exactly as entered.
    #[serde(default)]
    pub headers: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn from_answers(answers: InitAnswers) -> Self {
        let base_url = answers
            .base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            api_key: answers.api_key.filter(|key| !key.is_empty()),
            headers: answers.header.filter(|h| !h.is_empty()).into_iter().collect(),
        }
    }
}

/// Reads and writes [`ClientConfig`] at one path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The store in the current working directory.
    pub fn local() -> Self {
        Self::at(CONFIG_FILE)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a fresh configuration and overwrite whatever was stored before.
    ///
    /// `None` skips the prompts and writes the defaults.
    pub fn initialize(&self, answers: Option<InitAnswers>) -> Result<ClientConfig> {
        let config = answers.map(ClientConfig::from_answers).unwrap_or_default();
        self.write(&config)?;
        tracing::info!(path = %self.path.display(), base_url = %config.base_url, "configuration saved");
        Ok(config)
    }

    /// Atomic write: temp file, then rename over the target.
    pub fn write(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| VoxaError::validation(format!("cannot encode configuration: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    pub fn load(&self) -> Result<ClientConfig> {
        let not_found = |reason: String| VoxaError::ConfigNotFound {
            path: self.path.clone(),
            reason,
        };

        let json = fs::read_to_string(&self.path).map_err(|e| not_found(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| not_found(format!("unreadable JSON: {e}")))
    }
}
