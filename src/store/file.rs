// src/store/file.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use super::{Record, RecordKind, RecordStore, Tables};
use crate::error::AppError;

/// Store backed by a single JSON document on disk.
///
/// The whole document is held in memory and rewritten after every write
/// (temp file + rename, so a crash never leaves a half-written file).
/// A missing or empty file opens as an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let tables = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => {
                tracing::info!("Store file {} is empty, starting fresh", path.display());
                Tables::new()
            }
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("Store file {} is malformed: {:?}", path.display(), e);
                AppError::Storage(format!("malformed store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Store file {} not found, starting fresh", path.display());
                Tables::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::Storage("file store lock poisoned".to_string()))
    }

    fn flush(&self, tables: &Tables) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(tables)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Applies `change` to the in-memory tables and persists the result.
    /// On a failed flush the change is rolled back so memory and disk agree.
    fn write<F>(&self, kind: RecordKind, id: &str, change: F) -> Result<Option<Record>, AppError>
    where
        F: FnOnce(&mut Tables) -> Option<Record>,
    {
        let mut tables = self.lock()?;
        let previous = change(&mut *tables);

        if let Err(e) = self.flush(&tables) {
            tracing::error!(
                "Failed to persist {} '{}' to {}: {}",
                kind.as_str(),
                id,
                self.path.display(),
                e
            );
            let table = tables.entry(kind.as_str().to_string()).or_default();
            match previous {
                Some(record) => {
                    table.insert(id.to_string(), record);
                }
                None => {
                    table.remove(id);
                }
            }
            return Err(e);
        }

        Ok(previous)
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .get(kind.as_str())
            .and_then(|table| table.get(id))
            .cloned())
    }

    fn put(&self, kind: RecordKind, id: &str, record: Record) -> Result<(), AppError> {
        self.write(kind, id, |tables| {
            tables
                .entry(kind.as_str().to_string())
                .or_default()
                .insert(id.to_string(), record)
        })?;
        Ok(())
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, AppError> {
        // Nothing to persist when the record was never there.
        if self.get(kind, id)?.is_none() {
            return Ok(false);
        }
        let removed = self.write(kind, id, |tables| {
            tables
                .get_mut(kind.as_str())
                .and_then(|table| table.remove(id))
        })?;
        Ok(removed.is_some())
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
