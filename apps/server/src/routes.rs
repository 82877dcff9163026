//! HTTP surface: health check plus the load and sync endpoints.
//!
//! Handlers stay thin. They translate between HTTP and the core, decide
//! status codes and keep the wire shapes stable even when things go wrong:
//! a failed load answers with explicitly empty collections, a failed sync
//! still echoes the request's correlation token.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gantt_core::{Core, LoadResponse, SyncError, SyncResponse};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

pub fn router(core: Arc<Core>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/load", get(load))
        .route("/api/sync", post(sync))
        .layer(CorsLayer::permissive())
        .with_state(core)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

async fn load(State(core): State<Arc<Core>>) -> (StatusCode, Json<LoadResponse>) {
    match core.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(LoadResponse::from(snapshot))),
        Err(error) => {
            error!("Load failed: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoadResponse::failure("Failed to load data")),
            )
        }
    }
}

async fn sync(
    State(core): State<Arc<Core>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<SyncResponse>) {
    // Pulled out up front so a body that fails to decode still gets its
    // correlation token back.
    let request_id = payload
        .get("requestId")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match core.apply_sync(payload).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(error) => {
            match &error {
                SyncError::Decode(_) => warn!("Rejected sync payload: {}", error),
                SyncError::Database(_) => error!("Sync failed: {}", error),
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SyncResponse::failure(request_id, "Failed to sync data")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_router() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let core = Core::open(dir.path()).await.unwrap();
        (dir, router(Arc::new(core)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_running() {
        let (_dir, app) = test_router().await;

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "status": "ok", "message": "Server is running" }));
    }

    #[tokio::test]
    async fn load_returns_the_seeded_project() {
        let dir = TempDir::new().unwrap();
        let core = Core::open(dir.path()).await.unwrap();
        core.seed_demo().await.unwrap();
        let app = router(Arc::new(core));

        let response = app.oneshot(get_request("/api/load")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["tasks"]["rows"].as_array().unwrap().len(), 16);
        assert_eq!(body["tasks"]["rows"][0]["name"], json!("Project Setup"));
        assert_eq!(body["dependencies"]["rows"].as_array().unwrap().len(), 12);
        assert_eq!(body["resources"]["rows"][1]["name"], json!("Jane Smith"));
        assert_eq!(body["assignments"]["rows"][0]["eventId"], json!(2));
    }

    #[tokio::test]
    async fn load_on_a_fresh_store_is_empty_but_successful() {
        let (_dir, app) = test_router().await;

        let response = app.oneshot(get_request("/api/load")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["tasks"]["rows"], json!([]));
        assert_eq!(body["assignments"]["rows"], json!([]));
    }

    #[tokio::test]
    async fn sync_round_trips_phantom_ids() {
        let (_dir, app) = test_router().await;

        let payload = json!({
            "requestId": "42",
            "tasks": {
                "added": [{ "$PhantomId": "_generated1", "name": "New task" }]
            }
        });
        let response = app.oneshot(post_json("/api/sync", &payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["requestId"], json!("42"));
        assert_eq!(
            body["tasks"]["rows"],
            json!([{ "$PhantomId": "_generated1", "id": 1 }])
        );
        // Untouched collections stay out of the response entirely.
        assert!(body.get("dependencies").is_none());
        assert!(body.get("resources").is_none());
    }

    #[tokio::test]
    async fn malformed_sync_payload_gets_the_failure_shape() {
        let (_dir, app) = test_router().await;

        let payload = json!({
            "requestId": "7",
            "tasks": { "added": [{ "name": "Bad", "startDate": "yesterday-ish" }] }
        });
        let response = app.oneshot(post_json("/api/sync", &payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["requestId"], json!("7"));
        assert_eq!(body["message"], json!("Failed to sync data"));
    }
}
