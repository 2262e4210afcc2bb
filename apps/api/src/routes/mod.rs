pub mod health;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        // Candidate path
        .route(
            "/api/v1/sessions/:id/resume",
            post(sessions::handle_upload_resume).layer(upload_limit),
        )
        .route(
            "/api/v1/sessions/:id/resume/text",
            post(sessions::handle_resume_text),
        )
        .route(
            "/api/v1/sessions/:id/skills/suggest",
            post(sessions::handle_suggest_skills),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(sessions::handle_build_profile),
        )
        // Market path
        .route(
            "/api/v1/sessions/:id/market",
            post(sessions::handle_analyze_market),
        )
        .route(
            "/api/v1/sessions/:id/comparison",
            get(sessions::handle_comparison),
        )
        .with_state(state)
}
