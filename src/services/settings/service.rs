use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

/// Environment variable that overrides where the settings file lives
pub const CONFIG_ENV_VAR: &str = "GARDEN_CALENDAR_CONFIG";
pub const CONFIG_FILE_NAME: &str = "garden-calendar.toml";

const DATABASE_FILE_NAME: &str = "events.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "GardenCalendar", "GardenCalendar")
}

/// Loads and saves [`Settings`] as TOML
#[derive(Debug, Clone)]
pub struct SettingsService {
    path: Option<PathBuf>,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Use `$GARDEN_CALENDAR_CONFIG` if set, otherwise the platform config dir.
    /// With neither available the service only ever returns defaults.
    pub fn from_environment() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME)));
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the settings file. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings> {
        let Some(path) = &self.path else {
            log::warn!("No configuration directory available, using default settings");
            return Ok(Settings::default());
        };

        if !path.exists() {
            log::info!("No settings file at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {:?}: {}", path, e))?;

        log::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow!("No settings path available"))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file {:?}", path))?;
        Ok(())
    }

    /// Where the SQLite store lives when `store.database_path` is not set
    pub fn default_database_path() -> Result<PathBuf> {
        let dirs = project_dirs().context("Could not determine the data directory")?;
        Ok(dirs.data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::StoreBackend;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = SettingsService::new(dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(service.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let service = SettingsService::new(dir.path().join("nested").join(CONFIG_FILE_NAME));

        let mut settings = Settings::default();
        settings.first_day_of_week = 0;
        settings.max_rows = 4;
        settings.store.backend = StoreBackend::Memory;
        service.save(&settings).unwrap();

        assert_eq!(service.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "max_rows = 3\n").unwrap();

        let settings = SettingsService::new(&path).load().unwrap();
        assert_eq!(settings.max_rows, 3);
        assert_eq!(settings.first_day_of_week, 1);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "first_day_of_week = 9\n").unwrap();
        assert!(SettingsService::new(&path).load().is_err());

        fs::write(&path, "max_rows = \"many\"\n").unwrap();
        assert!(SettingsService::new(&path).load().is_err());
    }

    #[test]
    fn test_save_rejects_invalid_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut settings = Settings::default();
        settings.max_rows = 0;

        assert!(SettingsService::new(&path).save(&settings).is_err());
        assert!(!path.exists());
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::env::set_var(CONFIG_ENV_VAR, &path);
        let service = SettingsService::from_environment();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(service.path(), Some(path.as_path()));
    }
}
