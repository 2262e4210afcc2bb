use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::extract_pdf_text;
use crate::errors::AppError;
use crate::job_search::SearchQuery;
use crate::pipeline::candidate::{analyze_resume, build_profile, suggest_from_description};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::market::analyze_market;
use crate::skills::comparison::Comparison;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Deserialize)]
pub struct ResumeTextRequest {
    pub raw_text: String,
}

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub description: String,
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    /// Comma-separated skills typed by the candidate.
    #[serde(default)]
    pub manual_skills: String,
}

#[derive(Deserialize)]
pub struct MarketRequest {
    pub job_title: String,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let ctx = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated { session_id: ctx.id }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PipelineContext>, AppError> {
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// POST /api/v1/sessions/:id/resume
/// Multipart upload; the PDF is read from the `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PipelineContext>, AppError> {
    load(&state, id).await?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() == Some("file") {
            file = Some(
                field.bytes().await.map_err(upload_error)?,
            );
            break;
        }
    }
    let bytes = file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    let raw_text = extract_pdf_text(bytes).await?;
    store_resume(&state, id, raw_text).await
}

/// POST /api/v1/sessions/:id/resume/text
pub async fn handle_resume_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<PipelineContext>, AppError> {
    load(&state, id).await?;
    if req.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text must not be empty".to_string()));
    }
    store_resume(&state, id, req.raw_text).await
}

/// POST /api/v1/sessions/:id/skills/suggest
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<PipelineContext>, AppError> {
    load(&state, id).await?;
    if req.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description must not be empty".to_string(),
        ));
    }

    let report = suggest_from_description(&req.description, state.oracle.as_ref()).await;
    save(&state, id, |ctx| ctx.set_suggestions(report)).await
}

/// POST /api/v1/sessions/:id/profile
pub async fn handle_build_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<PipelineContext>, AppError> {
    let ctx = load(&state, id).await?;

    let report = build_profile(
        ctx.extracted_skills(),
        &req.manual_skills,
        state.oracle.as_ref(),
    )
    .await;
    save(&state, id, |ctx| ctx.set_profile(report)).await
}

/// POST /api/v1/sessions/:id/market
/// An invalid title or a failed search leaves the previous market result in place.
pub async fn handle_analyze_market(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MarketRequest>,
) -> Result<Json<PipelineContext>, AppError> {
    load(&state, id).await?;

    let query = SearchQuery::from_config(&req.job_title, &state.config);
    let analysis = analyze_market(
        &query,
        state.config.skill_frequency_threshold,
        state.oracle.as_ref(),
        state.job_search.as_ref(),
    )
    .await?;
    save(&state, id, |ctx| ctx.set_market(analysis)).await
}

/// GET /api/v1/sessions/:id/comparison
pub async fn handle_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Comparison>, AppError> {
    let ctx = load(&state, id).await?;
    Ok(Json(ctx.comparison()))
}

async fn store_resume(
    state: &AppState,
    id: Uuid,
    raw_text: String,
) -> Result<Json<PipelineContext>, AppError> {
    let report = analyze_resume(&raw_text, state.oracle.as_ref()).await;
    save(state, id, |ctx| ctx.set_resume(raw_text, report)).await
}

async fn load(state: &AppState, id: Uuid) -> Result<PipelineContext, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

async fn save<F>(state: &AppState, id: Uuid, f: F) -> Result<Json<PipelineContext>, AppError>
where
    F: FnOnce(&mut PipelineContext),
{
    state
        .sessions
        .update(id, f)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// Body-limit failures surface as 413, everything else as a bad request.
fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}
