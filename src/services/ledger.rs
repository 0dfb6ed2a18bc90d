// src/services/ledger.rs

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use chrono::Utc;

use crate::{
    error::AppError,
    models::answer::{Answer, AnswerStatus, StatusCounts},
    services::registry::{fetch_question, fetch_questions},
    store::{RecordKind, RecordStore},
    utils::text,
};

/// Owns answer records: submission, grading and per-grouping aggregates.
#[derive(Clone)]
pub struct AnswerLedger {
    store: Arc<dyn RecordStore>,
}

impl AnswerLedger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn all_answers(&self) -> Result<Vec<Answer>, AppError> {
        self.store
            .list(RecordKind::Answer)?
            .iter()
            .map(|(_, record)| Answer::from_record(record))
            .collect()
    }

    /// Stores a student's answer, replacing any earlier one for the same question.
    pub fn submit_answer(
        &self,
        question_id: &str,
        student_id: &str,
        text: &str,
    ) -> Result<Answer, AppError> {
        self.submit_group_answer(question_id, student_id, text, None)
    }

    /// Like [`submit_answer`](Self::submit_answer), tagging the answer with a team label.
    ///
    /// * The status is always recomputed: a previous manual grade does not survive.
    /// * With a reference answer the result is Correct or Incorrect, otherwise Ungraded.
    pub fn submit_group_answer(
        &self,
        question_id: &str,
        student_id: &str,
        text: &str,
        group_name: Option<&str>,
    ) -> Result<Answer, AppError> {
        let student_id = text::required("student_id", student_id)?;

        let question = fetch_question(self.store.as_ref(), question_id)?.ok_or_else(|| {
            tracing::warn!("Answer from {} for unknown question {}", student_id, question_id);
            AppError::NotFound(format!("Question '{}' not found", question_id))
        })?;

        let submitted_text = text.trim().to_string();
        let status = AnswerStatus::evaluate(question.reference_answer.as_deref(), &submitted_text);

        let answer = Answer {
            question_id: question.id,
            student_id,
            submitted_text,
            group_name: text::optional(group_name),
            status,
            submitted_at: Utc::now(),
            graded_at: None,
        };

        let key = Answer::record_id(&answer.question_id, &answer.student_id);
        let replaced = self.store.get(RecordKind::Answer, &key)?.is_some();
        self.store.put(RecordKind::Answer, &key, answer.to_record())?;

        tracing::info!(
            "{} answer from {} for question {}: {}",
            if replaced { "Replaced" } else { "Stored" },
            answer.student_id,
            answer.question_id,
            answer.status.as_str()
        );
        Ok(answer)
    }

    /// Teacher override of an existing answer's status.
    pub fn grade_answer(
        &self,
        question_id: &str,
        student_id: &str,
        correct: bool,
    ) -> Result<Answer, AppError> {
        let student_id = text::required("student_id", student_id)?;
        let key = Answer::record_id(question_id, &student_id);
        let missing = || {
            tracing::warn!("Grade for missing answer {} / {}", question_id, student_id);
            AppError::NotFound(format!(
                "No answer from '{}' for question '{}'",
                student_id, question_id
            ))
        };

        let record = self.store.get(RecordKind::Answer, &key)?.ok_or_else(missing)?;
        let mut answer = Answer::from_record(&record)?;
        if answer.question_id != question_id || answer.student_id != student_id {
            return Err(missing());
        }

        answer.status = AnswerStatus::ManuallyGraded { correct };
        answer.graded_at = Some(Utc::now());
        self.store.put(RecordKind::Answer, &key, answer.to_record())?;

        tracing::info!(
            "Graded answer from {} for question {}: {}",
            answer.student_id,
            answer.question_id,
            answer.status.as_str()
        );
        Ok(answer)
    }

    /// Answers for one question, by student id. Unknown questions have none.
    pub fn list_answers(&self, question_id: &str) -> Result<Vec<Answer>, AppError> {
        let mut answers: Vec<Answer> = self
            .all_answers()?
            .into_iter()
            .filter(|a| a.question_id == question_id)
            .collect();
        answers.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        Ok(answers)
    }

    /// Teacher review across questions: answers whose student id contains
    /// `student_search` (case-insensitive), optionally limited to one grouping.
    /// Ordered by student id, then question creation order.
    pub fn search_answers(
        &self,
        date_or_week: Option<&str>,
        student_search: &str,
    ) -> Result<Vec<Answer>, AppError> {
        let positions: BTreeMap<String, i64> = fetch_questions(self.store.as_ref())?
            .into_iter()
            .filter(|q| date_or_week.is_none_or(|label| q.date_or_week == label))
            .map(|q| (q.id, q.position))
            .collect();
        let needle = student_search.trim().to_lowercase();

        let mut answers: Vec<Answer> = self
            .all_answers()?
            .into_iter()
            .filter(|a| positions.contains_key(&a.question_id))
            .filter(|a| needle.is_empty() || a.student_id.to_lowercase().contains(&needle))
            .collect();
        answers.sort_by(|a, b| {
            a.student_id
                .cmp(&b.student_id)
                .then_with(|| positions[&a.question_id].cmp(&positions[&b.question_id]))
        });
        Ok(answers)
    }

    /// Status counts per question of a grouping. Questions without answers
    /// are included with zero counts.
    pub fn summary(&self, date_or_week: &str) -> Result<BTreeMap<String, StatusCounts>, AppError> {
        let mut counts: BTreeMap<String, StatusCounts> = fetch_questions(self.store.as_ref())?
            .into_iter()
            .filter(|q| q.date_or_week == date_or_week)
            .map(|q| (q.id, StatusCounts::default()))
            .collect();

        for answer in self.all_answers()? {
            if let Some(entry) = counts.get_mut(&answer.question_id) {
                entry.tally(answer.status);
            }
        }
        Ok(counts)
    }

    /// Number of answers each student submitted within a grouping.
    pub fn student_answer_counts(
        &self,
        date_or_week: &str,
    ) -> Result<BTreeMap<String, usize>, AppError> {
        let question_ids: BTreeSet<String> = fetch_questions(self.store.as_ref())?
            .into_iter()
            .filter(|q| q.date_or_week == date_or_week)
            .map(|q| q.id)
            .collect();

        let mut counts = BTreeMap::new();
        for answer in self.all_answers()? {
            if question_ids.contains(&answer.question_id) {
                *counts.entry(answer.student_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Removes every answer for a question. Returns how many were removed.
    pub fn delete_answers_for(&self, question_id: &str) -> Result<usize, AppError> {
        let mut removed = 0;
        for answer in self.list_answers(question_id)? {
            let key = Answer::record_id(&answer.question_id, &answer.student_id);
            if self.store.delete(RecordKind::Answer, &key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
