//! Key-value slot persistence for roster data.
//!
//! # Responsibility
//! - Define the named-slot contract the record store persists through.
//! - Open and configure SQLite connections and apply schema migrations.
//! - Provide an in-memory slot store for tests and ephemeral sessions.
//!
//! # Invariants
//! - A slot holds one opaque UTF-8 value and is overwritten wholesale.
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write slots before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod open;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use open::{open_db, open_db_in_memory};
pub use sqlite::SqliteKeyValueStore;

/// Slot name used when configuration does not override it.
pub const DEFAULT_SLOT_KEY: &str = "roster_employees";

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Persisted slot content could not be decoded.
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
    Io(std::io::Error),
    /// Backend refused the write for a reason of its own.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Parse(err) => write!(f, "invalid persisted roster data: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize roster data: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Parse(err) | Self::Serialize(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Named-slot storage contract.
///
/// Implementations only move strings; encoding is the caller's concern.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
