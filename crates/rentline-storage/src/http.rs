//! HTTP surface for the object store.
//!
//! Serves previously uploaded objects so their derived public URLs
//! resolve, and accepts uploads for out-of-process clients.  The chat
//! composer uploads in-process through [`ObjectStore::put`]; these routes
//! mirror that contract over the wire.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::StorageError;
use crate::store::ObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ObjectStore>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/objects/*path", get(object_download).post(object_upload))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct UploadResponse {
    url: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn object_download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, StorageError> {
    let (data, content_type) = state.store.get(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}

async fn object_upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), StorageError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let url = state.store.put(&path, &body, content_type).await?;

    info!(path = %path, size = body.len(), "Object uploaded via API");

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting object HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ObjectStore::new(
            dir.path().to_path_buf(),
            "http://localhost:8080".into(),
            1024,
        )
        .await
        .unwrap();
        (
            AppState {
                store: Arc::new(store),
            },
            dir,
        )
    }

    #[tokio::test]
    async fn download_round_trip() {
        let (state, _dir) = test_state().await;
        state
            .store
            .put("chat-images/u1/1.png", b"png", "image/png")
            .await
            .unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/objects/chat-images/u1/1.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn missing_object_is_404() {
        let (state, _dir) = test_state().await;
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/objects/nope.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
