//! Configuration loading from environment variables.

use crate::constants::DEFAULT_DEBUGGER_ONLY;
use crate::selection::SelectionPolicy;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the settings file.
pub const SETTINGS_PATH_VAR: &str = "WATCHLIST_SETTINGS_PATH";
/// Environment variable toggling evaluator restricted mode.
pub const DEBUGGER_ONLY_VAR: &str = "WATCHLIST_DEBUGGER_ONLY";
/// Environment variable selecting `single` or `multi` row selection.
pub const SELECTION_VAR: &str = "WATCHLIST_SELECTION";

/// Runtime configuration for watchlist hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings_path: PathBuf,
    pub debugger_only: bool,
    pub selection_policy: SelectionPolicy,
}

fn expand_tilde(path: String, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn resolve_home_dir(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(home) = non_blank("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Some(profile) = non_blank("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }
    if let (Some(drive), Some(path)) = (non_blank("HOMEDRIVE"), non_blank("HOMEPATH")) {
        return Some(PathBuf::from(format!("{}{}", drive, path)));
    }
    env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a selection policy name (`single` or `multi`, case-insensitive).
pub fn parse_selection_policy(value: &str) -> Option<SelectionPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "single" => Some(SelectionPolicy::SingleRow),
        "multi" | "extended" => Some(SelectionPolicy::MultiRow),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unrecognized flag or policy values fall back to their defaults.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a variable name, if set.
    ///
    /// # Returns
    /// A populated [`Config`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let settings_path = match lookup(SETTINGS_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => expand_tilde(path, resolve_home_dir(&lookup)),
            _ => resolve_home_dir(&lookup)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("watchlist")
                .join("watchlist.json"),
        };
        Self {
            settings_path,
            debugger_only: lookup(DEBUGGER_ONLY_VAR)
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(DEFAULT_DEBUGGER_ONLY),
            selection_policy: lookup(SELECTION_VAR)
                .and_then(|value| parse_selection_policy(&value))
                .unwrap_or(SelectionPolicy::MultiRow),
        }
    }
}
