use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentError;
use crate::job_search::JobSearchError;
use crate::pipeline::market::MarketError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid job title: {0}")]
    InvalidJobTitle(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Job search error: {0}")]
    JobSearch(JobSearchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::InvalidJobTitle(title) => AppError::InvalidJobTitle(title),
            MarketError::TitleCheckUnavailable(e) => AppError::Llm(e.to_string()),
            MarketError::JobSearch(e) => AppError::JobSearch(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::InvalidJobTitle(title) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_JOB_TITLE",
                format!("'{title}' is not a recognized job title. Try e.g. 'Data Analyst'."),
            ),
            AppError::Document(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DOCUMENT_ERROR",
                e.to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The AI service could not be reached".to_string(),
                )
            }
            AppError::JobSearch(JobSearchError::QuotaExhausted) => {
                tracing::warn!("Job search quota exhausted");
                (
                    StatusCode::PAYMENT_REQUIRED,
                    "QUOTA_EXHAUSTED",
                    "The job search API credits are used up or the plan has expired".to_string(),
                )
            }
            AppError::JobSearch(e) => {
                tracing::error!("Job search error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "JOB_SEARCH_ERROR",
                    "The job search service returned an error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
