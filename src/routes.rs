// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{answers, attendance, questions, scores},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the question, answer, attendance and score routes.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (the components over one store).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let question_routes = Router::new()
        .route(
            "/",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/{id}",
            get(questions::get_question).delete(questions::delete_question),
        )
        .route(
            "/{id}/answers",
            get(answers::list_answers).post(answers::submit_answer),
        )
        .route(
            "/{id}/answers/{student_id}/grade",
            put(answers::grade_answer),
        );

    let grouping_routes = Router::new()
        .route("/", get(questions::list_groupings))
        .route("/{date_or_week}/summary", get(answers::get_summary))
        .route("/{date_or_week}/students", get(answers::get_student_counts))
        .route(
            "/{date_or_week}/class-scores/{student_id}",
            put(scores::save_class_score),
        )
        .route("/{date_or_week}/participation", get(scores::get_participation))
        .route(
            "/{date_or_week}/participation/{student_id}",
            put(scores::save_participation),
        );

    let attendance_routes = Router::new().route(
        "/",
        get(attendance::list_check_ins).post(attendance::check_in),
    );

    Router::new()
        .nest("/api/questions", question_routes)
        .nest("/api/groupings", grouping_routes)
        .nest("/api/check-ins", attendance_routes)
        .route("/api/answers", get(answers::search_answers))
        .route("/api/class-scores", get(scores::list_class_scores))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
