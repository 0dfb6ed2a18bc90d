// src/models/answer.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::AppError,
    store::{Record, Value, composite_key},
    utils::text::answers_match,
};

/// Grading state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnswerStatus {
    /// No reference answer and no teacher grade yet.
    Ungraded,
    /// Auto-evaluated as matching the reference answer.
    Correct,
    /// Auto-evaluated as not matching the reference answer.
    Incorrect,
    /// Teacher override. Stays until the student submits again.
    ManuallyGraded { correct: bool },
}

impl AnswerStatus {
    /// Status a fresh submission gets.
    pub fn evaluate(reference_answer: Option<&str>, submitted: &str) -> Self {
        match reference_answer {
            Some(reference) if answers_match(submitted, reference) => AnswerStatus::Correct,
            Some(_) => AnswerStatus::Incorrect,
            None => AnswerStatus::Ungraded,
        }
    }

    /// `Some(true)` / `Some(false)` once graded by any means, `None` while ungraded.
    pub fn outcome(&self) -> Option<bool> {
        match self {
            AnswerStatus::Ungraded => None,
            AnswerStatus::Correct => Some(true),
            AnswerStatus::Incorrect => Some(false),
            AnswerStatus::ManuallyGraded { correct } => Some(*correct),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerStatus::Ungraded => "ungraded",
            AnswerStatus::Correct => "correct",
            AnswerStatus::Incorrect => "incorrect",
            AnswerStatus::ManuallyGraded { correct: true } => "manually_correct",
            AnswerStatus::ManuallyGraded { correct: false } => "manually_incorrect",
        }
    }
}

impl FromStr for AnswerStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ungraded" => Ok(AnswerStatus::Ungraded),
            "correct" => Ok(AnswerStatus::Correct),
            "incorrect" => Ok(AnswerStatus::Incorrect),
            "manually_correct" => Ok(AnswerStatus::ManuallyGraded { correct: true }),
            "manually_incorrect" => Ok(AnswerStatus::ManuallyGraded { correct: false }),
            other => Err(AppError::Storage(format!("unknown answer status '{}'", other))),
        }
    }
}

/// A student's submission for one question. At most one per
/// (question_id, student_id); resubmitting replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub student_id: String,
    pub submitted_text: String,

    /// Team label for group work, if the student gave one.
    pub group_name: Option<String>,

    pub status: AnswerStatus,
    pub submitted_at: DateTime<Utc>,

    /// When the teacher last overrode the status.
    pub graded_at: Option<DateTime<Utc>>,
}

impl Answer {
    /// Storage key of the answer for this pair.
    pub fn record_id(question_id: &str, student_id: &str) -> String {
        composite_key(question_id, student_id)
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("question_id", self.question_id.as_str())
            .with("student_id", self.student_id.as_str())
            .with("submitted_text", self.submitted_text.as_str())
            .with("group_name", Value::from(self.group_name.clone()))
            .with("status", self.status.as_str())
            .with("submitted_at", self.submitted_at)
            .with("graded_at", Value::from(self.graded_at))
    }

    pub fn from_record(record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            question_id: record.text("question_id")?,
            student_id: record.text("student_id")?,
            submitted_text: record.text("submitted_text")?,
            group_name: record.opt_text("group_name")?,
            status: record.text("status")?.parse()?,
            submitted_at: record.timestamp("submitted_at")?,
            graded_at: record.opt_timestamp("graded_at")?,
        })
    }
}

/// Per-question tally used by the grouping summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub ungraded_count: usize,
}

impl StatusCounts {
    pub fn tally(&mut self, status: AnswerStatus) {
        match status.outcome() {
            Some(true) => self.correct_count += 1,
            Some(false) => self.incorrect_count += 1,
            None => self.ungraded_count += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.correct_count + self.incorrect_count + self.ungraded_count
    }
}

/// DTO for a student submission.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    #[validate(length(max = 5000))]
    pub text: String,
    #[validate(length(max = 100))]
    pub group_name: Option<String>,
}

/// DTO for a teacher's manual grade.
#[derive(Debug, Deserialize)]
pub struct GradeAnswerRequest {
    pub correct: bool,
}
