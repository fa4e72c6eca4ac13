//! Application settings.
//!
//! Loaded from `garden-calendar.toml`; every field has a default so a missing
//! or partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default movement (in pixels, per axis) before a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f32 = 3.0;
/// Default number of stacking rows a week renders before "+N more".
pub const DEFAULT_MAX_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// First day of the week, 0 = Sunday ... 6 = Saturday
    pub first_day_of_week: u8,
    pub drag_threshold_px: f32,
    pub max_rows: usize,
    pub store: StoreSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            first_day_of_week: 1, // Monday
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            max_rows: DEFAULT_MAX_ROWS,
            store: StoreSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if self.first_day_of_week > 6 {
            return Err(SettingsValidationError::FirstDayOfWeek(self.first_day_of_week));
        }
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px < 0.0 {
            return Err(SettingsValidationError::DragThreshold(self.drag_threshold_px));
        }
        if self.max_rows == 0 {
            return Err(SettingsValidationError::MaxRows);
        }
        if self.store.backend == StoreBackend::Remote && self.store.api_base_url.is_none() {
            return Err(SettingsValidationError::MissingApiUrl);
        }
        if self.store.timeout_secs == 0 {
            return Err(SettingsValidationError::Timeout);
        }
        Ok(())
    }
}

/// Which event store adapter the application talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// SQLite file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Base URL of the mini-app API, e.g. `https://garden.example.com`
    pub api_base_url: Option<String>,
    /// Raw `initData` string the chat platform hands to the mini-app
    pub init_data: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_path: None,
            api_base_url: None,
            init_data: None,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsValidationError {
    #[error("first_day_of_week must be between 0 and 6, got {0}")]
    FirstDayOfWeek(u8),
    #[error("drag_threshold_px must be a non-negative number, got {0}")]
    DragThreshold(f32),
    #[error("max_rows must be at least 1")]
    MaxRows,
    #[error("store.api_base_url is required for the remote backend")]
    MissingApiUrl,
    #[error("store.timeout_secs must be at least 1")]
    Timeout,
}
