// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    store::{Record, Value},
};

/// A teacher-defined question, persisted as a `question` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Generated once, never changed. Answers join on it.
    pub id: String,

    /// Grouping label, e.g. "2024-09-02" or "W1".
    pub date_or_week: String,

    /// The text content of the question.
    pub text: String,

    /// Expected answer. When present, submissions are graded automatically.
    pub reference_answer: Option<String>,

    /// Insertion index; listing sorts by it.
    pub position: i64,

    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id.as_str())
            .with("date_or_week", self.date_or_week.as_str())
            .with("text", self.text.as_str())
            .with("reference_answer", Value::from(self.reference_answer.clone()))
            .with("position", self.position)
            .with("created_at", self.created_at)
    }

    pub fn from_record(record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            id: record.text("id")?,
            date_or_week: record.text("date_or_week")?,
            text: record.text("text")?,
            reference_answer: record.opt_text("reference_answer")?,
            position: record.int("position")?,
            created_at: record.timestamp("created_at")?,
        })
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub date_or_week: String,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(length(max = 500))]
    pub reference_answer: Option<String>,
}

/// Query string for listing questions.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionFilter {
    pub date_or_week: Option<String>,
}
