// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, QuestionFilter},
    state::AppState,
};

/// Creates a question. Teacher action.
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let question = state
        .run(move |s| {
            s.registry.create_question(
                &payload.date_or_week,
                &payload.text,
                payload.reference_answer.as_deref(),
            )
        })
        .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Lists questions in creation order, optionally for one date/week.
pub async fn list_questions(
    State(state): State<AppState>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let questions = state
        .run(move |s| s.registry.list_questions(filter.date_or_week.as_deref()))
        .await?;
    Ok(Json(questions))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let question = state.run(move |s| s.registry.get_question(&id)).await?;
    Ok(Json(question))
}

/// Deletes a question and all answers to it.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.run(move |s| s.registry.delete_question(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct date/week labels, newest first.
pub async fn list_groupings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.run(|s| s.registry.list_groupings()).await?))
}
