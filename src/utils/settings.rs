//! Settings and configuration utilities.
//!
//! Settings are read from $HOME/.fix-commit-encoding/settings.json and act as
//! a fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Environment variable naming an extra correction file.
pub const TABLE_ENV_VAR: &str = "FIX_COMMIT_ENCODING_TABLE";

/// Settings loaded from $HOME/.fix-commit-encoding/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path; a missing file yields defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".fix-commit-encoding").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.env.get(key).cloned())
    }

    /// Picks the correction file: explicit flag, then environment, then settings.
    pub fn resolve_table_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| {
            self.get_env_var(TABLE_ENV_VAR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }
}

/// Resolves the correction file for a command, loading settings from the default location.
///
/// An unreadable settings file is reported and ignored.
pub fn resolve_table_path(flag: Option<&Path>) -> Option<PathBuf> {
    if flag.is_some() {
        return flag.map(Path::to_path_buf);
    }
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Ignoring settings: {e:#}");
        Settings::default()
    });
    settings.resolve_table_path(None)
}
