//! Core domain logic for the employee roster.
//! Front ends hold one `RecordService` and route every action through it.

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{ConfigError, RosterConfig};
pub use export::csv::{
    export_file_name, render_csv, CsvDialect, CsvDialectKind, LegacyCsv, Rfc4180Csv,
    CSV_HEADER, CSV_MIME_TYPE,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{sample_employees, EmployeeForm, EmployeeId, EmployeeRecord};
pub use search::filter::{IndexedMatches, Matches, RecordQuery};
pub use service::record_service::{ExportOutcome, Notice, RecordService, ServiceError};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
    DEFAULT_SLOT_KEY,
};
pub use store::record_store::{
    load_collection, IdCollisionPolicy, RecordStore, RecordStoreError, RecordStoreResult,
    StoreOptions,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
