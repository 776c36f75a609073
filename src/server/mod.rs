// src/server/mod.rs
//! HTTP surface for report generation.

mod handlers;

use crate::error::AppError;
use crate::pipeline::ReportPipeline;
use axum::{routing::get, Router};
use std::sync::Arc;

pub use handlers::{ErrorBody, GenerateRequest, GenerateResponse, HealthResponse};

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ReportPipeline>,
}

impl AppState {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route(
            "/generate",
            get(handlers::generate_from_query).post(handlers::generate_from_json),
        )
        .with_state(state)
}

/// Binds `host:port` and serves until the process is stopped.
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
