//! Form-level roster service.
//!
//! # Responsibility
//! - Interpret the form's edit-index (empty = create, number = update).
//! - Seed the fixed sample set and write CSV export files.
//! - Map store errors to user-facing messages.
//!
//! # Invariants
//! - Row positions handed to front ends come from enumeration, never from
//!   value-equality lookups, so identical records stay addressable.

use crate::export::csv::{write_export, DEFAULT_EXPORT_PREFIX};
use crate::model::employee::{sample_employees, EmployeeForm, EmployeeRecord};
use crate::store::record_store::{RecordStore, RecordStoreError};
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for roster use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Edit-index is neither empty nor a non-negative integer.
    InvalidEditIndex(String),
    Store(RecordStoreError),
    /// Export file could not be written.
    Export(std::io::Error),
}

impl ServiceError {
    /// Message suitable for an alert or status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(RecordStoreError::DuplicateKey(_)) => {
                "An employee with this ID already exists!".to_string()
            }
            Self::Store(RecordStoreError::EmptyCollection) => "No data to export!".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEditIndex(value) => write!(f, "invalid edit index: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEditIndex(_) => None,
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RecordStoreError> for ServiceError {
    fn from(value: RecordStoreError) -> Self {
        Self::Store(value)
    }
}

/// Short confirmation shown after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub rows: usize,
    pub notice: Notice,
}

/// Roster service facade over a [`RecordStore`].
pub struct RecordService<S: KeyValueStore> {
    store: RecordStore<S>,
    export_prefix: String,
}

impl<S: KeyValueStore> RecordService<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            store,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }

    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn into_store(self) -> RecordStore<S> {
        self.store
    }

    /// Handles a form submit.
    ///
    /// A blank `edit_index` creates; otherwise the record at that position
    /// is replaced.
    pub fn submit(&mut self, form: EmployeeForm, edit_index: &str) -> ServiceResult<Notice> {
        let record = form.into_record();
        match parse_edit_index(edit_index)? {
            None => {
                self.store.create(record)?;
                Ok(Notice::new("Employee added successfully!"))
            }
            Some(index) => {
                self.store.update(index, record)?;
                Ok(Notice::new("Employee updated successfully!"))
            }
        }
    }

    /// Replaces the record holding `id` with the submitted form.
    pub fn submit_for_id(&mut self, id: &str, form: EmployeeForm) -> ServiceResult<Notice> {
        self.store.update_by_id(id, form.into_record())?;
        Ok(Notice::new("Employee updated successfully!"))
    }

    /// Returns the prefilled form for editing the record at `index`.
    pub fn edit_form(&self, index: usize) -> ServiceResult<EmployeeForm> {
        Ok(EmployeeForm::from_record(self.store.get(index)?))
    }

    pub fn delete(&mut self, index: usize) -> ServiceResult<Notice> {
        self.store.delete(index)?;
        Ok(Notice::new("Employee deleted successfully!"))
    }

    pub fn delete_by_id(&mut self, id: &str) -> ServiceResult<Notice> {
        self.store.delete_by_id(id)?;
        Ok(Notice::new("Employee deleted successfully!"))
    }

    pub fn clear_all(&mut self) -> ServiceResult<Notice> {
        self.store.clear()?;
        Ok(Notice::new("All data cleared."))
    }

    pub fn seed_samples(&mut self) -> ServiceResult<Notice> {
        let added = self.store.seed(sample_employees())?;
        if added > 0 {
            Ok(Notice::new(format!("Seeded {added} employees!")))
        } else {
            Ok(Notice::new("Sample data already exists."))
        }
    }

    /// Writes `{prefix}_{date}.csv` under `dir`.
    pub fn export(&self, dir: &Path, date: NaiveDate) -> ServiceResult<ExportOutcome> {
        let contents = self.store.export_csv()?;
        let path = write_export(dir, &self.export_prefix, date, &contents)
            .map_err(ServiceError::Export)?;
        Ok(ExportOutcome {
            path,
            rows: self.store.len(),
            notice: Notice::new("CSV Exported!"),
        })
    }

    /// Rows to render for the current search text, with their true positions.
    pub fn visible(&self, query: &str) -> Vec<(usize, &EmployeeRecord)> {
        self.store.search_indexed(query).collect()
    }
}

fn parse_edit_index(value: &str) -> ServiceResult<Option<usize>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ServiceError::InvalidEditIndex(value.to_string()))
}
