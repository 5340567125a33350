use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{Backend, Mutation, Table};
use crate::repository::RallyStore;
use crate::StorageError;

/// Process-local tables. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<BTreeMap<Table, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    fn lock(&self) -> MutexGuard<'_, BTreeMap<Table, BTreeMap<String, Vec<u8>>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for MemoryBackend {
    fn get(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock().get(&table).and_then(|t| t.get(key)).cloned())
    }

    fn scan(&self, table: Table) -> Result<Vec<Vec<u8>>, StorageError> {
        Ok(self
            .lock()
            .get(&table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default())
    }

    fn mutate(&self, table: Table, key: &str, mutation: Mutation<'_>) -> Result<(), StorageError> {
        let mut tables = self.lock();
        let rows = tables.entry(table).or_default();
        match mutation(rows.get(key).map(Vec::as_slice))? {
            Some(bytes) => {
                rows.insert(key.to_string(), bytes);
            }
            None => {
                rows.remove(key);
            }
        }
        Ok(())
    }
}

pub type MemoryStore = RallyStore<MemoryBackend>;

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::default())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
