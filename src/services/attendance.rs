// src/services/attendance.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppError,
    models::check_in::CheckIn,
    store::{RecordKind, RecordStore},
    utils::text,
};

/// Which students showed up for which date/week.
#[derive(Clone)]
pub struct AttendanceLog {
    store: Arc<dyn RecordStore>,
}

impl AttendanceLog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Records a check-in. Checking in twice keeps the first timestamp.
    pub fn check_in(&self, student_id: &str, date_or_week: &str) -> Result<CheckIn, AppError> {
        let student_id = text::required("student_id", student_id)?;
        let date_or_week = text::required("date_or_week", date_or_week)?;
        let key = CheckIn::record_id(&date_or_week, &student_id);

        if let Some(record) = self.store.get(RecordKind::CheckIn, &key)? {
            tracing::debug!("{} already checked in for '{}'", student_id, date_or_week);
            return CheckIn::from_record(&record);
        }

        let check_in = CheckIn {
            student_id,
            date_or_week,
            checked_in_at: Utc::now(),
        };
        self.store
            .put(RecordKind::CheckIn, &key, check_in.to_record())?;

        tracing::info!(
            "{} checked in for '{}'",
            check_in.student_id,
            check_in.date_or_week
        );
        Ok(check_in)
    }

    /// Check-ins in arrival order, optionally for one date/week.
    pub fn list_check_ins(&self, date_or_week: Option<&str>) -> Result<Vec<CheckIn>, AppError> {
        let mut check_ins = self
            .store
            .list(RecordKind::CheckIn)?
            .iter()
            .map(|(_, record)| CheckIn::from_record(record))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(label) = date_or_week {
            check_ins.retain(|c| c.date_or_week == label);
        }
        check_ins.sort_by(|a, b| {
            a.checked_in_at
                .cmp(&b.checked_in_at)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        Ok(check_ins)
    }
}
