use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Errors that can occur when loading the settings file from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the settings file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the settings file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read settings at {}: {}", path_display(path), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse settings at {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn StdError>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;
            let config: Config =
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }
}

/// Default settings location under the platform config directory.
pub fn default_config_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "permacommons", "crayonbox")
        .expect("Failed to determine config directory");
    proj_dirs.config_dir().join("config.toml")
}

#[derive(Default)]
struct CacheState {
    config: Option<Config>,
    modified: Option<SystemTime>,
}

struct StoreInner {
    path: PathBuf,
    state: Mutex<CacheState>,
}

/// Handle to the persisted settings file. The handle is passed explicitly
/// into the theme store and session controller; there is no ambient global
/// config. Cloning is cheap and all clones share one cache.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

impl SettingsStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Open the store at the platform default location and run the one-shot
    /// startup migrations.
    pub fn open_default() -> Result<Self, Box<dyn StdError>> {
        let store = Self::open(default_config_path());
        crate::core::config::migrate::run_startup_migrations(&store)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Current settings snapshot, re-read from disk only when the file
    /// changed since the last load.
    pub fn load(&self) -> Result<Config, Box<dyn StdError>> {
        let mut state = self.inner.state.lock().unwrap();
        self.refresh(&mut state)?;
        Ok(state.config.clone().unwrap_or_default())
    }

    /// Read-modify-write cycle: reloads if stale, applies the mutator, and
    /// persists atomically.
    pub fn mutate<F, T>(&self, mutator: F) -> Result<T, Box<dyn StdError>>
    where
        F: FnOnce(&mut Config) -> Result<T, Box<dyn StdError>>,
    {
        let mut state = self.inner.state.lock().unwrap();
        self.refresh(&mut state)?;

        let mut working = state.config.clone().unwrap_or_default();
        let result = mutator(&mut working)?;
        working.save_to_path(&self.inner.path)?;
        state.modified = Self::modified_time(&self.inner.path);
        state.config = Some(working);
        Ok(result)
    }

    fn refresh(&self, state: &mut CacheState) -> Result<(), Box<dyn StdError>> {
        let disk_modified = Self::modified_time(&self.inner.path);
        if state.config.is_none() || state.modified != disk_modified {
            let config = Config::load_from_path(&self.inner.path)?;
            state.modified = disk_modified;
            state.config = Some(config);
        }
        Ok(())
    }

    fn modified_time(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).ok()?.modified().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::temp_store;

    #[test]
    fn missing_file_loads_default_settings() {
        let (store, _dir) = temp_store();
        let config = store.load().expect("load");
        assert!(config.default_model.is_none());
        assert!(config.custom_themes.is_empty());
    }

    #[test]
    fn mutate_round_trips_through_disk() {
        let (store, _dir) = temp_store();
        store
            .mutate(|config| {
                config.set_api_key("google", "g-123");
                config.default_model = Some("imagen-ultra".to_string());
                Ok(())
            })
            .expect("mutate");

        // A second handle on the same path sees the persisted state.
        let reopened = SettingsStore::open(store.path());
        let config = reopened.load().expect("load");
        assert_eq!(config.api_key_for("google"), Some("g-123"));
        assert_eq!(config.selected_model_key(), "imagen-ultra");
    }

    #[test]
    fn parse_errors_name_the_offending_file() {
        let (store, _dir) = temp_store();
        fs::write(store.path(), "not = [valid").expect("write");
        let err = store.load().expect_err("should fail to parse");
        assert!(err.to_string().contains("Failed to parse settings"));
    }
}
