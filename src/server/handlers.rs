// src/server/handlers.rs
use super::AppState;
use crate::error::AppError;
use crate::types::{PageId, ValidationError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================
// Wire types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Query string of `GET /generate` and body of `POST /generate`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub page_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: String,
    pub url: String,
    pub project_title: String,
    pub notes_count: usize,
    pub tasks_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub detail: String,
}

// ============================================================
// Error mapping
// ============================================================

/// An [`AppError`] on its way to the client.
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("Report generation failed: {}", self.0);
        } else {
            log::warn!("Rejected report request: {}", self.0);
        }

        let body = ErrorBody {
            status: "error".to_string(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================
// Routes
// ============================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Service is healthy".to_string(),
    })
}

pub async fn generate_from_query(
    State(state): State<AppState>,
    Query(request): Query<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    generate(&state, request).await
}

pub async fn generate_from_json(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    generate(&state, request).await
}

async fn generate(
    state: &AppState,
    request: GenerateRequest,
) -> Result<Json<GenerateResponse>, ApiError> {
    let raw = request
        .page_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ValidationError::EmptyField("page_id"))?;
    let project_id = PageId::parse(&raw)?;

    log::info!("Generating report for {}", project_id);
    let summary = state.pipeline.generate(&project_id).await?;

    Ok(Json(GenerateResponse {
        status: "ok".to_string(),
        url: summary.url().to_string(),
        project_title: summary.project_title,
        notes_count: summary.notes_count,
        tasks_count: summary.tasks_count,
    }))
}
