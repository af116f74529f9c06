//! Configuration management for perfdeck.
//!
//! Persists user preferences across sessions:
//! - recent applications and recent event types (MRU lists, capped)
//! - the last selected call-graph mode
//! - per-application parameters and working directory
//!
//! # Settings Management
//!
//! The `SettingsManager` provides thread-safe access to `AppState`:
//! - Uses `Arc<RwLock<AppState>>` for parallel reads from UI and tasks
//! - Persists state to `<config dir>/perfdeck/settings.json`
//! - Falls back to defaults when the file is missing or unparsable

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Maximum number of entries kept in a recent-value list.
pub const MAX_RECENT_ENTRIES: usize = 10;

/// Per-application preferences, restored whenever that application is
/// re-selected in the launch form.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppPrefs {
    /// Argument string, split shell-style when the recording starts.
    pub params: String,
    /// Working directory; empty means "next to the executable".
    pub working_dir: String,
}

/// Application state persisted between sessions.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Recently launched applications, most recent first.
    pub recent_applications: Vec<String>,
    /// Recently used `--event` specs, most recent first.
    pub recent_event_types: Vec<String>,
    /// Last selected call-graph mode, stored as the perf argument value
    /// ("", "dwarf", "fp", "lbr").
    pub call_graph: String,
    /// Per-application preferences keyed by application path.
    pub app_prefs: HashMap<String, AppPrefs>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            recent_applications: Vec::new(),
            recent_event_types: Vec::new(),
            call_graph: "dwarf".to_string(),
            app_prefs: HashMap::new(),
        }
    }
}

impl AppState {
    /// Look up stored preferences for an application path.
    pub fn prefs_for(&self, application: &str) -> AppPrefs {
        self.app_prefs.get(application).cloned().unwrap_or_default()
    }

    /// Store preferences for an application path.
    pub fn remember_application(&mut self, application: &str, params: &str, working_dir: &str) {
        self.app_prefs.insert(
            application.to_string(),
            AppPrefs {
                params: params.to_string(),
                working_dir: working_dir.to_string(),
            },
        );
        remember_recent(&mut self.recent_applications, application);
    }
}

/// Push `value` onto the front of a recent-value list.
///
/// Invariants: no duplicates (an existing value moves to the front instead),
/// length capped at `MAX_RECENT_ENTRIES`.
pub fn remember_recent(list: &mut Vec<String>, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(idx) = list.iter().position(|v| v == value) {
        list.remove(idx);
    }
    list.insert(0, value.to_string());
    list.truncate(MAX_RECENT_ENTRIES);
}

/// Settings persistence. All methods are stateless; the settings path is
/// resolved per call so tests can redirect it via `PERFDECK_CONFIG_DIR`.
pub struct SettingsManager;

impl SettingsManager {
    /// Resolve the settings directory.
    ///
    /// `PERFDECK_CONFIG_DIR` overrides the per-user config dir, which keeps
    /// integration tests hermetic.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("PERFDECK_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|d| d.join("perfdeck"))
            .ok_or(ConfigError::NoConfigDir)
    }

    fn settings_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("settings.json"))
    }

    /// Load AppState from settings.json, or return defaults if the file
    /// doesn't exist.
    ///
    /// If deserialization fails, logs a warning and returns defaults
    /// instead of erroring out. This provides graceful fallback when the
    /// settings format changes between versions.
    pub fn load() -> Result<AppState, ConfigError> {
        let path = Self::settings_path()?;

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<AppState>(&content) {
                Ok(state) => Ok(state),
                Err(e) => {
                    log::warn!(
                        "[Config] Failed to parse {}, falling back to defaults: {}",
                        path.display(),
                        e
                    );
                    Ok(AppState::default())
                }
            },
            Err(_) => Ok(AppState::default()),
        }
    }

    /// Save AppState to settings.json, creating the directory if needed.
    pub fn save(state: &AppState) -> Result<(), ConfigError> {
        let dir = Self::config_dir()?;
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(ConfigError::IoError)?;
        }

        let content = serde_json::to_string_pretty(state).map_err(ConfigError::InvalidJson)?;
        std::fs::write(Self::settings_path()?, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Create a thread-safe shared instance of AppState.
    pub fn new_shared() -> Result<Arc<RwLock<AppState>>, ConfigError> {
        let state = Self::load()?;
        Ok(Arc::new(RwLock::new(state)))
    }
}
