// src/store/mod.rs

//! Record storage collaborator.
//!
//! Components never touch persisted bytes directly: they turn their typed
//! models into flat [`Record`]s and hand them to a [`RecordStore`].

pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// In-memory layout shared by the store implementations:
/// kind name -> record id -> record.
pub(crate) type Tables = BTreeMap<String, BTreeMap<String, Record>>;

/// The record kinds the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Question,
    Answer,
    CheckIn,
    ClassScore,
    Participation,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Question => "question",
            RecordKind::Answer => "answer",
            RecordKind::CheckIn => "check_in",
            RecordKind::ClassScore => "class_score",
            RecordKind::Participation => "participation",
        }
    }
}

/// Storage key for a record identified by two free-form strings.
///
/// The first part is length-prefixed, so no choice of separator inside
/// either part can make two different pairs share a key.
pub fn composite_key(first: &str, second: &str) -> String {
    format!("{}:{}:{}", first.len(), first, second)
}

/// A primitive field value. Records never nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A flat mapping of field names to primitive values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn text(&self, field: &str) -> Result<String, AppError> {
        match self.0.get(field) {
            Some(Value::Text(s)) => Ok(s.clone()),
            other => Err(field_error(field, "text", other)),
        }
    }

    pub fn opt_text(&self, field: &str) -> Result<Option<String>, AppError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            other => Err(field_error(field, "text or null", other)),
        }
    }

    pub fn int(&self, field: &str) -> Result<i64, AppError> {
        match self.0.get(field) {
            Some(Value::Int(i)) => Ok(*i),
            other => Err(field_error(field, "int", other)),
        }
    }

    pub fn float(&self, field: &str) -> Result<f64, AppError> {
        match self.0.get(field) {
            Some(Value::Float(f)) => Ok(*f),
            other => Err(field_error(field, "float", other)),
        }
    }

    pub fn timestamp(&self, field: &str) -> Result<DateTime<Utc>, AppError> {
        match self.0.get(field) {
            Some(Value::Timestamp(t)) => Ok(*t),
            other => Err(field_error(field, "timestamp", other)),
        }
    }

    pub fn opt_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Timestamp(t)) => Ok(Some(*t)),
            other => Err(field_error(field, "timestamp or null", other)),
        }
    }
}

fn field_error(field: &str, expected: &str, found: Option<&Value>) -> AppError {
    match found {
        None => AppError::Storage(format!("record is missing field '{}'", field)),
        Some(v) => AppError::Storage(format!(
            "record field '{}' should be {}, found {:?}",
            field, expected, v
        )),
    }
}

/// Durable keyed record storage.
///
/// Implementations serialize writes internally, so a shared handle can be
/// used from any thread. No cross-record transactions are offered.
pub trait RecordStore: Send + Sync {
    fn get(&self, kind: RecordKind, id: &str) -> Result<Option<Record>, AppError>;

    /// Inserts or replaces the record stored under `id`.
    fn put(&self, kind: RecordKind, id: &str, record: Record) -> Result<(), AppError>;

    /// Removes the record. Returns whether anything was removed.
    fn delete(&self, kind: RecordKind, id: &str) -> Result<bool, AppError>;

    /// All records of a kind, in ascending id order.
    fn list(&self, kind: RecordKind) -> Result<Vec<(String, Record)>, AppError>;
}
