//! Record filter predicate.
//!
//! # Invariants
//! - The query is lowercased once; `name` and `address` are lowercased per
//!   comparison, `id` is compared as stored.
//! - An empty query matches every record.
//! - Results keep collection order and are recomputed on every call.

use crate::model::employee::EmployeeRecord;
use std::iter::Enumerate;
use std::slice::Iter;

/// Normalized free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordQuery {
    needle: String,
}

impl RecordQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    /// Lowercased query text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        record.name.to_lowercase().contains(&self.needle)
            || record.id.contains(&self.needle)
            || record.address.to_lowercase().contains(&self.needle)
    }
}

/// Lazy iterator over matching records.
///
/// Cloning yields an independent cursor, so the sequence can be restarted.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    inner: IndexedMatches<'a>,
}

impl<'a> Matches<'a> {
    pub fn new(records: &'a [EmployeeRecord], query: RecordQuery) -> Self {
        Self {
            inner: IndexedMatches::new(records, query),
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a EmployeeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, record)| record)
    }
}

/// Lazy iterator over matching records paired with their collection position.
#[derive(Debug, Clone)]
pub struct IndexedMatches<'a> {
    records: Enumerate<Iter<'a, EmployeeRecord>>,
    query: RecordQuery,
}

impl<'a> IndexedMatches<'a> {
    pub fn new(records: &'a [EmployeeRecord], query: RecordQuery) -> Self {
        Self {
            records: records.iter().enumerate(),
            query,
        }
    }
}

impl<'a> Iterator for IndexedMatches<'a> {
    type Item = (usize, &'a EmployeeRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let query = &self.query;
        self.records.find(|(_, record)| query.matches(record))
    }
}
