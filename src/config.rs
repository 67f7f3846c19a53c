use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "soda-free-counter";
pub const DATA_FILE: &str = "soda_free_date.txt";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DATA_PATH_ENV: &str = "SODA_FREE_DATA_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    data_path: Option<PathBuf>,
}

impl Settings {
    /// Resolves settings from the environment, the user's settings file and
    /// the platform data directory, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let settings_path = dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE));
        Self::resolve(
            env::var_os(DATA_PATH_ENV).map(PathBuf::from),
            settings_path.as_deref(),
            dirs::data_dir(),
        )
    }

    /// Platform default location, ignoring any overrides.
    pub fn fallback() -> Result<Self, ConfigError> {
        Self::resolve(None, None, dirs::data_dir())
    }

    fn resolve(
        env_override: Option<PathBuf>,
        settings_path: Option<&Path>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(data_path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self { data_path });
        }

        if let Some(path) = settings_path {
            if let Some(data_path) = read_settings_file(path)?.data_path {
                return Ok(Self { data_path });
            }
        }

        let data_dir = data_dir.ok_or(ConfigError::NoDataDir)?;
        Ok(Self {
            data_path: data_dir.join(APP_DIR).join(DATA_FILE),
        })
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SettingsFile::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
