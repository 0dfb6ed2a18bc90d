// src/services/scores.rs

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::AppError,
    models::class_score::{ClassScore, Participation},
    store::{RecordKind, RecordStore},
    utils::text,
};

/// Per-student class scores and participation counts, both keyed by
/// (student_id, date_or_week).
#[derive(Clone)]
pub struct ScoreBook {
    store: Arc<dyn RecordStore>,
}

impl ScoreBook {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Saves a score for a student, replacing any earlier one for the same date/week.
    pub fn save_class_score(
        &self,
        student_id: &str,
        date_or_week: &str,
        score: f64,
        note: Option<&str>,
    ) -> Result<ClassScore, AppError> {
        let student_id = text::required("student_id", student_id)?;
        let date_or_week = text::required("date_or_week", date_or_week)?;
        if !score.is_finite() {
            return Err(AppError::Validation("score must be a finite number".to_string()));
        }

        let class_score = ClassScore {
            student_id,
            date_or_week,
            score,
            note: text::optional(note),
        };
        let key = ClassScore::record_id(&class_score.date_or_week, &class_score.student_id);
        self.store
            .put(RecordKind::ClassScore, &key, class_score.to_record())?;

        tracing::info!(
            "Saved class score {} for {} on '{}'",
            class_score.score,
            class_score.student_id,
            class_score.date_or_week
        );
        Ok(class_score)
    }

    /// Scores ordered by date/week, then student id.
    pub fn list_class_scores(&self, date_or_week: Option<&str>) -> Result<Vec<ClassScore>, AppError> {
        let mut scores = self
            .store
            .list(RecordKind::ClassScore)?
            .iter()
            .map(|(_, record)| ClassScore::from_record(record))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(label) = date_or_week {
            scores.retain(|s| s.date_or_week == label);
        }
        scores.sort_by(|a, b| {
            a.date_or_week
                .cmp(&b.date_or_week)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        Ok(scores)
    }

    /// Sets a student's participation count for a date/week.
    pub fn save_participation(
        &self,
        student_id: &str,
        date_or_week: &str,
        count: u32,
    ) -> Result<Participation, AppError> {
        let participation = Participation {
            student_id: text::required("student_id", student_id)?,
            date_or_week: text::required("date_or_week", date_or_week)?,
            count: i64::from(count),
        };
        let key = Participation::record_id(&participation.date_or_week, &participation.student_id);
        self.store
            .put(RecordKind::Participation, &key, participation.to_record())?;

        tracing::info!(
            "Participation for {} on '{}' set to {}",
            participation.student_id,
            participation.date_or_week,
            participation.count
        );
        Ok(participation)
    }

    /// student_id -> participation count for one date/week.
    pub fn participation_counts(&self, date_or_week: &str) -> Result<BTreeMap<String, i64>, AppError> {
        let mut counts = BTreeMap::new();
        for (_, record) in self.store.list(RecordKind::Participation)? {
            let participation = Participation::from_record(&record)?;
            if participation.date_or_week == date_or_week {
                counts.insert(participation.student_id, participation.count);
            }
        }
        Ok(counts)
    }
}
