// src/handlers/attendance.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::check_in::{CheckInFilter, CheckInRequest},
    state::AppState,
};

pub async fn check_in(
    State(state): State<AppState>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let check_in = state
        .run(move |s| s.attendance.check_in(&payload.student_id, &payload.date_or_week))
        .await?;
    Ok((StatusCode::CREATED, Json(check_in)))
}

pub async fn list_check_ins(
    State(state): State<AppState>,
    Query(filter): Query<CheckInFilter>,
) -> Result<impl IntoResponse, AppError> {
    let check_ins = state
        .run(move |s| s.attendance.list_check_ins(filter.date_or_week.as_deref()))
        .await?;
    Ok(Json(check_ins))
}
