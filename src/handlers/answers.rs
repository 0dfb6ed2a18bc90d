// src/handlers/answers.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::answer::{GradeAnswerRequest, SubmitAnswerRequest},
    state::AppState,
};

/// Submits (or resubmits) a student's answer.
///
/// * Auto-graded when the question has a reference answer.
/// * Any earlier answer from the same student is replaced.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let answer = state
        .run(move |s| {
            s.ledger.submit_group_answer(
                &question_id,
                &payload.student_id,
                &payload.text,
                payload.group_name.as_deref(),
            )
        })
        .await?;

    Ok(Json(answer))
}

/// Teacher review: every answer for a question, by student id.
pub async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.run(move |s| s.ledger.list_answers(&question_id)).await?))
}

/// Query string for the cross-question answer search.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerSearch {
    pub date_or_week: Option<String>,
    pub student: Option<String>,
}

/// Teacher review across questions, filtered by date/week and student id substring.
pub async fn search_answers(
    State(state): State<AppState>,
    Query(search): Query<AnswerSearch>,
) -> Result<impl IntoResponse, AppError> {
    let answers = state
        .run(move |s| {
            s.ledger.search_answers(
                search.date_or_week.as_deref(),
                search.student.as_deref().unwrap_or(""),
            )
        })
        .await?;
    Ok(Json(answers))
}

/// Manual grade, overriding auto-evaluation.
pub async fn grade_answer(
    State(state): State<AppState>,
    Path((question_id, student_id)): Path<(String, String)>,
    Json(payload): Json<GradeAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answer = state
        .run(move |s| s.ledger.grade_answer(&question_id, &student_id, payload.correct))
        .await?;
    Ok(Json(answer))
}

/// Per-question status counts for a date/week.
pub async fn get_summary(
    State(state): State<AppState>,
    Path(date_or_week): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.run(move |s| s.ledger.summary(&date_or_week)).await?))
}

/// Answers submitted per student for a date/week.
pub async fn get_student_counts(
    State(state): State<AppState>,
    Path(date_or_week): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let counts = state
        .run(move |s| s.ledger.student_answer_counts(&date_or_week))
        .await?;
    Ok(Json(counts))
}
