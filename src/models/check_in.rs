// src/models/check_in.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    store::{Record, composite_key},
};

/// A student's check-in for one date/week. Only the first one is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub student_id: String,
    pub date_or_week: String,
    pub checked_in_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn record_id(date_or_week: &str, student_id: &str) -> String {
        composite_key(date_or_week, student_id)
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("student_id", self.student_id.as_str())
            .with("date_or_week", self.date_or_week.as_str())
            .with("checked_in_at", self.checked_in_at)
    }

    pub fn from_record(record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            student_id: record.text("student_id")?,
            date_or_week: record.text("date_or_week")?,
            checked_in_at: record.timestamp("checked_in_at")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    #[validate(length(min = 1, max = 100))]
    pub date_or_week: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckInFilter {
    pub date_or_week: Option<String>,
}
