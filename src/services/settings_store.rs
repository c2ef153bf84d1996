//! File-backed settings persistence

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use directories::ProjectDirs;
use tracing::{debug, info, warn};

use crate::state::{Settings, SettingsError};

/// Loads and saves the user's settings
pub trait SettingsStore: Send + Sync {
    /// Load settings, falling back to defaults when nothing usable is stored
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings stored as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Use `settings.json` in the platform config directory
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = match ProjectDirs::from("", "", "how-much-longer") {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from("how_much_longer_settings.json"),
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                warn!("Failed to read settings from {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => {
                debug!("Loaded settings from {}", self.path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring unreadable settings file {}: {}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)?;
        info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
