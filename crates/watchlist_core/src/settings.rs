//! Persisted watch expressions.
//!
//! Settings are stored as a small JSON document. Only expressions are
//! persisted; values and errors are always recomputed by the evaluator.

use crate::constants::{EXPRESSIONS_SETTING, SETTINGS_SECTION, SETTINGS_VERSION};
use crate::error::WatchlistError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Contents of the `watchlist` settings section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistSettings {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub expressions: Vec<String>,
}

fn default_version() -> String {
    SETTINGS_VERSION.to_string()
}

impl Default for WatchlistSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            expressions: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default, rename = "watchlist")]
    section: Option<WatchlistSettings>,
}

/// JSON settings file holding the `watchlist` section.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings, falling back to defaults when the file is missing.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<WatchlistSettings, WatchlistError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(WatchlistSettings::default());
            }
            Err(err) => return Err(err.into()),
        };
        let document: SettingsDocument = serde_json::from_str(&raw)?;
        Ok(document.section.unwrap_or_default())
    }

    /// Write the settings, replacing the file atomically.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, settings: &WatchlistSettings) -> Result<(), WatchlistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let document = SettingsDocument {
            section: Some(settings.clone()),
        };
        let json = serde_json::to_string_pretty(&document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::info!(
            path = %self.path.display(),
            section = SETTINGS_SECTION,
            setting = EXPRESSIONS_SETTING,
            expressions = settings.expressions.len(),
            "saved watchlist settings"
        );
        Ok(())
    }

    /// Persisted expression list, or an empty list when settings are unreadable.
    pub fn load_expressions(&self) -> Vec<String> {
        match self.load() {
            Ok(settings) => settings.expressions,
            Err(err) => {
                tracing::error!(path = %self.path.display(), "failed to load settings: {}", err);
                Vec::new()
            }
        }
    }

    /// Persist `expressions` as the shared expression list.
    ///
    /// # Errors
    /// Propagates [`SettingsFile::save`] failures.
    pub fn save_expressions(&self, expressions: Vec<String>) -> Result<(), WatchlistError> {
        self.save(&WatchlistSettings {
            version: default_version(),
            expressions,
        })
    }
}
