//! Slot-backed record store.
//!
//! # Responsibility
//! - Load the collection once from a key-value slot, failing soft.
//! - Apply create/update/delete/clear/seed and re-persist after each.
//! - Serve search and CSV export over the current collection.
//!
//! # Invariants
//! - Mutations are staged on a copy, persisted, then committed in memory.
//! - Insertion order is preserved; nothing sorts the collection.
//! - Log events carry counts and positions only, never field values.

use crate::export::csv::{render_csv, CsvDialect, CsvDialectKind};
use crate::model::employee::EmployeeRecord;
use crate::search::filter::{IndexedMatches, Matches, RecordQuery};
use crate::storage::{KeyValueStore, StorageError, DEFAULT_SLOT_KEY};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Errors surfaced by record store operations.
#[derive(Debug)]
pub enum RecordStoreError {
    /// A different record already uses this id.
    DuplicateKey(String),
    IndexOutOfRange { index: usize, len: usize },
    RecordNotFound(String),
    /// Export was requested with no records.
    EmptyCollection,
    Storage(StorageError),
}

impl Display for RecordStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(id) => write!(f, "employee id already exists: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range for {len} records")
            }
            Self::RecordNotFound(id) => write!(f, "employee not found: {id}"),
            Self::EmptyCollection => write!(f, "no records to export"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for RecordStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// How `update` treats an id that belongs to another record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCollisionPolicy {
    /// Replace unconditionally; two records may end up sharing an id.
    #[default]
    Allow,
    /// Fail with `DuplicateKey` when the new id is held by another record.
    Reject,
}

/// Construction options for [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub slot_key: String,
    pub id_collision: IdCollisionPolicy,
    pub csv_dialect: CsvDialectKind,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            id_collision: IdCollisionPolicy::default(),
            csv_dialect: CsvDialectKind::default(),
        }
    }
}

/// Reads and decodes the collection stored under `slot_key`.
///
/// Absent, unreadable or undecodable slots all yield an empty collection.
pub fn load_collection<S: KeyValueStore + ?Sized>(
    storage: &S,
    slot_key: &str,
) -> Vec<EmployeeRecord> {
    let payload = match storage.get(slot_key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            info!("event=records_load module=store status=ok source=empty count=0");
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=records_load module=store status=recovered error_code=storage_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_collection(&payload) {
        Ok(records) => {
            info!(
                "event=records_load module=store status=ok source=slot count={}",
                records.len()
            );
            records
        }
        Err(err) => {
            warn!(
                "event=records_load module=store status=recovered error_code=storage_parse_failed error={err}"
            );
            Vec::new()
        }
    }
}

fn decode_collection(payload: &str) -> Result<Vec<EmployeeRecord>, StorageError> {
    // `null` is an empty roster.
    let records: Option<Vec<EmployeeRecord>> =
        serde_json::from_str(payload).map_err(StorageError::Parse)?;
    Ok(records.unwrap_or_default())
}

/// Owner of the employee collection and its persisted mirror.
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    options: StoreOptions,
    records: Vec<EmployeeRecord>,
    dialect: Box<dyn CsvDialect>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Creates a store and loads the collection from `storage`.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let records = load_collection(&storage, &options.slot_key);
        let dialect = options.csv_dialect.dialect();
        Self {
            storage,
            options,
            records,
            dialect,
        }
    }

    /// Replaces the export dialect, e.g. with a custom escaper.
    pub fn with_dialect(mut self, dialect: Box<dyn CsvDialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Re-reads the slot, discarding the in-memory collection.
    pub fn load(&mut self) -> &[EmployeeRecord] {
        self.records = load_collection(&self.storage, &self.options.slot_key);
        &self.records
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn get(&self, index: usize) -> RecordStoreResult<&EmployeeRecord> {
        self.records
            .get(index)
            .ok_or(RecordStoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&EmployeeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Appends a record whose id is not yet present.
    pub fn create(&mut self, record: EmployeeRecord) -> RecordStoreResult<&[EmployeeRecord]> {
        if self.position_of(&record.id).is_some() {
            info!("event=record_create module=store status=rejected error_code=duplicate_key");
            return Err(RecordStoreError::DuplicateKey(record.id));
        }

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)?;
        info!(
            "event=record_create module=store status=ok count={}",
            self.records.len()
        );
        Ok(&self.records)
    }

    /// Replaces the record at `index`.
    ///
    /// Uniqueness against other records is checked only under
    /// [`IdCollisionPolicy::Reject`].
    pub fn update(
        &mut self,
        index: usize,
        record: EmployeeRecord,
    ) -> RecordStoreResult<&[EmployeeRecord]> {
        self.ensure_index(index)?;
        if self.options.id_collision == IdCollisionPolicy::Reject
            && self
                .records
                .iter()
                .enumerate()
                .any(|(position, other)| position != index && other.id == record.id)
        {
            info!(
                "event=record_update module=store status=rejected index={index} error_code=duplicate_key"
            );
            return Err(RecordStoreError::DuplicateKey(record.id));
        }

        let mut next = self.records.clone();
        next[index] = record;
        self.commit(next)?;
        info!("event=record_update module=store status=ok index={index}");
        Ok(&self.records)
    }

    /// Replaces the record currently holding `id`.
    pub fn update_by_id(
        &mut self,
        id: &str,
        record: EmployeeRecord,
    ) -> RecordStoreResult<&[EmployeeRecord]> {
        let index = self
            .position_of(id)
            .ok_or_else(|| RecordStoreError::RecordNotFound(id.to_string()))?;
        self.update(index, record)
    }

    /// Removes and returns the record at `index`.
    pub fn delete(&mut self, index: usize) -> RecordStoreResult<EmployeeRecord> {
        self.ensure_index(index)?;

        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(
            "event=record_delete module=store status=ok index={index} count={}",
            self.records.len()
        );
        Ok(removed)
    }

    /// Removes and returns the first record holding `id`.
    pub fn delete_by_id(&mut self, id: &str) -> RecordStoreResult<EmployeeRecord> {
        let index = self
            .position_of(id)
            .ok_or_else(|| RecordStoreError::RecordNotFound(id.to_string()))?;
        self.delete(index)
    }

    /// Empties the collection.
    pub fn clear(&mut self) -> RecordStoreResult<()> {
        let previous = self.records.len();
        self.commit(Vec::new())?;
        info!("event=records_clear module=store status=ok removed={previous}");
        Ok(())
    }

    /// Appends every sample whose id is not present yet and returns how many
    /// were added. Persists only when something was added.
    pub fn seed<I>(&mut self, samples: I) -> RecordStoreResult<usize>
    where
        I: IntoIterator<Item = EmployeeRecord>,
    {
        let mut next = self.records.clone();
        let mut added = 0;
        for sample in samples {
            if next.iter().any(|record| record.id == sample.id) {
                continue;
            }
            next.push(sample);
            added += 1;
        }

        if added > 0 {
            self.commit(next)?;
        }
        info!("event=records_seed module=store status=ok added={added}");
        Ok(added)
    }

    /// Lazily yields records matching `query`, in collection order.
    pub fn search(&self, query: &str) -> Matches<'_> {
        Matches::new(&self.records, RecordQuery::new(query))
    }

    /// Like [`RecordStore::search`], paired with each record's position.
    pub fn search_indexed(&self, query: &str) -> IndexedMatches<'_> {
        IndexedMatches::new(&self.records, RecordQuery::new(query))
    }

    /// Renders the whole collection as CSV.
    pub fn export_csv(&self) -> RecordStoreResult<String> {
        if self.records.is_empty() {
            return Err(RecordStoreError::EmptyCollection);
        }
        Ok(render_csv(&self.records, self.dialect.as_ref()))
    }

    fn ensure_index(&self, index: usize) -> RecordStoreResult<()> {
        if index >= self.records.len() {
            return Err(RecordStoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }

    fn commit(&mut self, next: Vec<EmployeeRecord>) -> RecordStoreResult<()> {
        let payload = serde_json::to_string(&next).map_err(StorageError::Serialize)?;
        if let Err(err) = self.storage.set(&self.options.slot_key, &payload) {
            error!(
                "event=records_persist module=store status=error error_code=storage_write_failed error={err}"
            );
            return Err(err.into());
        }
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_collection, load_collection};
    use crate::storage::MemoryKeyValueStore;

    #[test]
    fn null_payload_decodes_as_empty() {
        assert!(decode_collection("null").unwrap().is_empty());
    }

    #[test]
    fn non_array_payload_is_a_parse_error() {
        assert!(decode_collection(r#"{"id":"1"}"#).is_err());
    }

    #[test]
    fn record_missing_fields_recovers_to_empty() {
        let storage = MemoryKeyValueStore::with_slot("k", r#"[{"id":"1"}]"#);
        assert!(load_collection(&storage, "k").is_empty());
    }
}
