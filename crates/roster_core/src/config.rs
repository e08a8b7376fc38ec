//! TOML configuration for roster front ends.
//!
//! # Responsibility
//! - Describe storage, logging, export and policy settings.
//! - Merge an optional `roster.toml` over built-in defaults.
//!
//! # Invariants
//! - Every key is optional; missing sections fall back to defaults.
//! - A present but malformed file is an error, never silently ignored.

use crate::export::csv::{CsvDialectKind, DEFAULT_EXPORT_PREFIX};
use crate::logging::default_log_level;
use crate::storage::DEFAULT_SLOT_KEY;
use crate::store::record_store::{IdCollisionPolicy, StoreOptions};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "roster";
const DB_FILE_NAME: &str = "roster.sqlite3";
pub const CONFIG_FILE_NAME: &str = "roster.toml";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; defaults under the platform data directory.
    pub db_path: Option<PathBuf>,
    pub slot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: default_app_dir().map(|dir| dir.join("logs")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub prefix: String,
    pub dialect: CsvDialectKind,
    pub dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            dialect: CsvDialectKind::default(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub id_collision: IdCollisionPolicy,
}

impl RosterConfig {
    /// Parses configuration text.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Loads `path` when it exists, otherwise returns defaults.
    ///
    /// With no explicit path, `roster.toml` in the platform config dir is tried.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let candidate = match path {
            Some(path) => Some(path.to_path_buf()),
            None => dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)),
        };
        match candidate {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Effective database path.
    pub fn db_path(&self) -> PathBuf {
        self.storage.db_path.clone().unwrap_or_else(|| {
            default_app_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DB_FILE_NAME)
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            slot_key: self.storage.slot_key.clone(),
            id_collision: self.policy.id_collision,
            csv_dialect: self.export.dialect,
        }
    }
}

fn default_app_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}
