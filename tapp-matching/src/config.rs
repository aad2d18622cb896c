use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MatchingConfig {
    pub data: Option<DataConfig>,
    pub logging: Option<LoggingConfig>,
    pub matching: Option<MatchingDefaults>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MatchingDefaults {
    /// Hours staged by `toggle-assigned` when none are given
    pub default_hours: Option<f64>,
}

const DEFAULT_CONFIG: &str = r#"
[data]
# Matching snapshot exported from the admin backend
# snapshot_path = "/path/to/matching.json"

[logging]
level = "info"
# file = "/path/to/tapp-match.log"

[matching]
# Falls back to the position's hours per assignment when unset
# default_hours = 54.0
"#;

impl MatchingConfig {
    /// Load from the user config directory, writing a commented default file
    /// on first run. `TAPP_` environment variables override file values, e.g.
    /// `TAPP_LOGGING__LEVEL=debug`.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(env)
            .build()?;

        builder.try_deserialize()
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data
            .as_ref()
            .and_then(|data| data.snapshot_path.as_ref())
            .map(PathBuf::from)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.file.as_ref())
            .map(PathBuf::from)
    }

    pub fn default_hours(&self) -> Option<f64> {
        self.matching.as_ref().and_then(|m| m.default_hours)
    }
}

/// `TAPP_<SECTION>__<KEY>`
fn environment() -> Environment {
    Environment::with_prefix("TAPP")
        .prefix_separator("_")
        .separator("__")
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("tapp").join("matching.toml")
    } else {
        PathBuf::from("matching.toml")
    }
}
