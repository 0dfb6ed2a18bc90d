// src/models/class_score.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    store::{Record, Value, composite_key},
};

/// Teacher-entered score for a student on one date/week. Saving again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub student_id: String,
    pub date_or_week: String,
    pub score: f64,
    pub note: Option<String>,
}

impl ClassScore {
    pub fn record_id(date_or_week: &str, student_id: &str) -> String {
        composite_key(date_or_week, student_id)
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("student_id", self.student_id.as_str())
            .with("date_or_week", self.date_or_week.as_str())
            .with("score", self.score)
            .with("note", Value::from(self.note.clone()))
    }

    pub fn from_record(record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            student_id: record.text("student_id")?,
            date_or_week: record.text("date_or_week")?,
            score: record.float("score")?,
            note: record.opt_text("note")?,
        })
    }
}

/// How many times a student took part in class on one date/week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub student_id: String,
    pub date_or_week: String,
    pub count: i64,
}

impl Participation {
    pub fn record_id(date_or_week: &str, student_id: &str) -> String {
        composite_key(date_or_week, student_id)
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("student_id", self.student_id.as_str())
            .with("date_or_week", self.date_or_week.as_str())
            .with("count", self.count)
    }

    pub fn from_record(record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            student_id: record.text("student_id")?,
            date_or_week: record.text("date_or_week")?,
            count: record.int("count")?,
        })
    }
}

/// DTO for saving a class score. Student and date/week come from the path.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveClassScoreRequest {
    pub score: f64,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveParticipationRequest {
    pub count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassScoreFilter {
    pub date_or_week: Option<String>,
}
