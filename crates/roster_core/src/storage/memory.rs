//! In-memory slot store.

use super::{KeyValueStore, StorageResult};
use std::collections::HashMap;

/// `HashMap`-backed slot store. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    slots: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot already populated.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self { slots }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}
