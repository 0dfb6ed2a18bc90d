// src/services/registry.rs

use std::{collections::BTreeSet, sync::Arc};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::question::Question,
    services::ledger::AnswerLedger,
    store::{RecordKind, RecordStore},
    utils::text,
};

/// Reads one question straight from the store.
/// Shared with the ledger, which needs reference answers but never writes questions.
pub(crate) fn fetch_question(
    store: &dyn RecordStore,
    id: &str,
) -> Result<Option<Question>, AppError> {
    store
        .get(RecordKind::Question, id)?
        .map(|record| Question::from_record(&record))
        .transpose()
}

/// All questions in creation order.
pub(crate) fn fetch_questions(store: &dyn RecordStore) -> Result<Vec<Question>, AppError> {
    let mut questions = store
        .list(RecordKind::Question)?
        .iter()
        .map(|(_, record)| Question::from_record(record))
        .collect::<Result<Vec<_>, _>>()?;
    questions.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(questions)
}

/// Owns question records: creation, listing and deletion.
#[derive(Clone)]
pub struct QuestionRegistry {
    store: Arc<dyn RecordStore>,
    ledger: AnswerLedger,
}

impl QuestionRegistry {
    /// `ledger` receives the cascade when a question is deleted.
    pub fn new(store: Arc<dyn RecordStore>, ledger: AnswerLedger) -> Self {
        Self { store, ledger }
    }

    /// Creates and immediately persists a question.
    ///
    /// * Text and label must be non-empty once trimmed.
    /// * A blank reference answer is treated as none, leaving the question
    ///   for manual grading.
    pub fn create_question(
        &self,
        date_or_week: &str,
        text: &str,
        reference_answer: Option<&str>,
    ) -> Result<Question, AppError> {
        let date_or_week = text::required("date_or_week", date_or_week)?;
        let text = text::required("text", text)?;
        let reference_answer = text::optional(reference_answer);

        let existing = fetch_questions(self.store.as_ref())?;
        let position = existing.iter().map(|q| q.position).max().unwrap_or(0) + 1;

        let mut id = Uuid::new_v4().to_string();
        while self.store.get(RecordKind::Question, &id)?.is_some() {
            id = Uuid::new_v4().to_string();
        }

        let question = Question {
            id,
            date_or_week,
            text,
            reference_answer,
            position,
            created_at: Utc::now(),
        };

        self.store
            .put(RecordKind::Question, &question.id, question.to_record())?;

        tracing::info!(
            "Created question {} for '{}' (auto-graded: {})",
            question.id,
            question.date_or_week,
            question.reference_answer.is_some()
        );
        Ok(question)
    }

    pub fn get_question(&self, id: &str) -> Result<Question, AppError> {
        fetch_question(self.store.as_ref(), id)?
            .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", id)))
    }

    /// Questions in creation order, optionally limited to one grouping.
    pub fn list_questions(&self, date_or_week: Option<&str>) -> Result<Vec<Question>, AppError> {
        let questions = fetch_questions(self.store.as_ref())?;
        let filtered: Vec<Question> = match date_or_week {
            Some(label) => questions
                .into_iter()
                .filter(|q| q.date_or_week == label)
                .collect(),
            None => questions,
        };
        tracing::debug!("Listed {} questions (filter: {:?})", filtered.len(), date_or_week);
        Ok(filtered)
    }

    /// Distinct grouping labels that have questions, newest label first.
    pub fn list_groupings(&self) -> Result<Vec<String>, AppError> {
        let labels: BTreeSet<String> = fetch_questions(self.store.as_ref())?
            .into_iter()
            .map(|q| q.date_or_week)
            .collect();
        Ok(labels.into_iter().rev().collect())
    }

    /// Deletes a question together with every answer submitted for it.
    pub fn delete_question(&self, id: &str) -> Result<(), AppError> {
        if fetch_question(self.store.as_ref(), id)?.is_none() {
            tracing::warn!("Refusing to delete unknown question {}", id);
            return Err(AppError::NotFound(format!("Question '{}' not found", id)));
        }

        let removed_answers = self.ledger.delete_answers_for(id)?;
        self.store.delete(RecordKind::Question, id)?;

        tracing::info!("Deleted question {} and {} answer(s)", id, removed_answers);
        Ok(())
    }
}
