// src/handlers/scores.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::class_score::{ClassScoreFilter, SaveClassScoreRequest, SaveParticipationRequest},
    state::AppState,
};

/// Saves (or replaces) a teacher-entered score for one student.
pub async fn save_class_score(
    State(state): State<AppState>,
    Path((date_or_week, student_id)): Path<(String, String)>,
    Json(payload): Json<SaveClassScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let score = state
        .run(move |s| {
            s.scores.save_class_score(
                &student_id,
                &date_or_week,
                payload.score,
                payload.note.as_deref(),
            )
        })
        .await?;
    Ok(Json(score))
}

pub async fn list_class_scores(
    State(state): State<AppState>,
    Query(filter): Query<ClassScoreFilter>,
) -> Result<impl IntoResponse, AppError> {
    let scores = state
        .run(move |s| s.scores.list_class_scores(filter.date_or_week.as_deref()))
        .await?;
    Ok(Json(scores))
}

pub async fn save_participation(
    State(state): State<AppState>,
    Path((date_or_week, student_id)): Path<(String, String)>,
    Json(payload): Json<SaveParticipationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let participation = state
        .run(move |s| s.scores.save_participation(&student_id, &date_or_week, payload.count))
        .await?;
    Ok(Json(participation))
}

/// student_id -> participation count for a date/week.
pub async fn get_participation(
    State(state): State<AppState>,
    Path(date_or_week): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state
        .run(move |s| s.scores.participation_counts(&date_or_week))
        .await?;
    Ok(Json(counts))
}
