// src/store/memory.rs

use std::sync::{Mutex, MutexGuard};

use super::{Record, RecordKind, RecordStore, Tables};
use crate::error::AppError;

/// Process-local store. Everything is lost when the process exits, which is
/// what an ephemeral deployment gets anyway.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .get(kind.as_str())
            .and_then(|table| table.get(id))
            .cloned())
    }

    fn put(&self, kind: RecordKind, id: &str, record: Record) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables
            .entry(kind.as_str().to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        Ok(tables
            .get_mut(kind.as_str())
            .and_then(|table| table.remove(id))
            .is_some())
    }

    fn list(&self, kind: RecordKind) -> Result<Vec<(String, Record)>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .get(kind.as_str())
            .map(|table| {
                table
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
