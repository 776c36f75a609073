// tests/http_api.rs
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::*;
use notion2report::server::{
    create_router, AppState, ErrorBody, GenerateResponse, HealthResponse,
};
use notion2report::{ExportConfig, Exporter, ReportConfig, ReportPipeline, WorkspaceClient};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn router_for(workspace: FakeWorkspace, timeout: Duration) -> Router {
    let client: Arc<dyn WorkspaceClient> = Arc::new(workspace);
    let storage = Arc::new(RecordingStorage::default());
    let exporter = Exporter::new(ExportConfig::default(), storage).unwrap();
    let pipeline = ReportPipeline::new(client, ReportConfig::default(), exporter)
        .with_url_property(Some("Latest PDF URL".to_string()))
        .with_timeout(timeout);
    create_router(AppState::new(pipeline))
}

fn router() -> Router {
    router_for(apollo_workspace(), Duration::from_secs(30))
}

async fn call<T: DeserializeOwned>(app: Router, request: Request<Body>) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let (status, body): (_, HealthResponse) = call(router(), get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.status, "ok");
    assert_eq!(body.message, "Service is healthy");
}

#[tokio::test]
async fn test_generate_from_query_string() {
    let uri = format!("/generate?page_id={}", page_id(1));
    let (status, body): (_, GenerateResponse) = call(router(), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.status, "ok");
    assert_eq!(body.project_title, "Apollo");
    assert_eq!(body.tasks_count, 2);
    assert_eq!(body.notes_count, 1);
    assert!(body.url.starts_with("mem://reports/0000/project-apollo-"));
}

#[tokio::test]
async fn test_generate_from_json_body_accepts_notion_urls() {
    let url = format!("https://www.notion.so/acme/Apollo-{}", page_id(1));
    let request = post_json("/generate", serde_json::json!({ "page_id": url }));
    let (status, body): (_, GenerateResponse) = call(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.project_title, "Apollo");
}

#[tokio::test]
async fn test_malformed_page_id_is_rejected() {
    let (status, body): (_, ErrorBody) =
        call(router(), get("/generate?page_id=not-a-page")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.status, "error");
    assert!(body.detail.contains("not-a-page"));
}

#[tokio::test]
async fn test_missing_page_id_is_rejected() {
    let (status, body): (_, ErrorBody) = call(router(), get("/generate")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.detail.contains("page_id"));
}

#[tokio::test]
async fn test_unknown_project_is_a_bad_request() {
    let uri = format!("/generate?page_id={}", page_id(404));
    let (status, body): (_, ErrorBody) = call(router(), get(&uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.status, "error");
}

#[tokio::test]
async fn test_slow_generation_times_out() {
    let slow = apollo_workspace().with_latency(Duration::from_secs(5));
    let app = router_for(slow, Duration::from_millis(50));
    let uri = format!("/generate?page_id={}", page_id(1));

    let (status, body): (_, ErrorBody) = call(app, get(&uri)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body.detail.contains("timed out"));
}
