//! HTTP router.
//!
//! Returns a composable `Router` with all endpoints nested under
//! `/api/`. CORS is permissive; the service carries no auth layer and
//! is expected to sit behind the deployment's own perimeter.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::state::AppState;

pub fn api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/chat/send", post(endpoints::chat::send))
        .route("/chat/sessions/:id", delete(endpoints::chat::end))
        .route(
            "/submissions",
            post(endpoints::submissions::create).get(endpoints::submissions::list),
        )
        .with_state(state);

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::AppConfig;

    /// Build a router over a fresh state directory. The state is
    /// constructed off the runtime because the backend client is
    /// blocking. No credential is configured, so any request that
    /// reaches the backend fails before a network call.
    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        let state = tokio::task::spawn_blocking(move || {
            AppState::new(AppConfig::for_tests(data_dir)).unwrap()
        })
        .await
        .unwrap();
        (dir, api_router(Arc::new(state)))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (_dir, app) = test_app().await;

        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_rejects_empty_symptoms() {
        let (_dir, app) = test_app().await;

        let req = json_request("POST", "/api/analyze", r#"{"symptoms":"   "}"#);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"], "Symptoms description cannot be empty");
    }

    #[tokio::test]
    async fn analyze_without_credential_returns_500() {
        let (_dir, app) = test_app().await;

        let req = json_request("POST", "/api/analyze", r#"{"symptoms":"fever and cough"}"#);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response_json(response).await;
        assert_eq!(
            json["error"],
            "OpenAI API key not configured. Please contact the administrator."
        );
    }

    #[tokio::test]
    async fn chat_send_rejects_empty_message() {
        let (_dir, app) = test_app().await;

        let req = json_request("POST", "/api/chat/send", r#"{"message":""}"#);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_send_without_credential_returns_500() {
        let (_dir, app) = test_app().await;

        let req = json_request("POST", "/api/chat/send", r#"{"message":"headache"}"#);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response_json(response).await;
        assert_eq!(
            json["error"],
            "OpenAI API key not configured. Please contact the administrator."
        );
    }

    #[tokio::test]
    async fn chat_end_unknown_session_returns_404() {
        let (_dir, app) = test_app().await;

        let uri = format!("/api/chat/sessions/{}", uuid::Uuid::new_v4());
        let req = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn submissions_list_requires_owner_id() {
        let (_dir, app) = test_app().await;

        let req = Request::builder()
            .uri("/api/submissions?owner_id=")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submissions_list_is_empty_for_new_owner() {
        let (_dir, app) = test_app().await;

        let req = Request::builder()
            .uri("/api/submissions?owner_id=user-1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["submissions"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn submissions_create_rejects_invalid_image_encoding() {
        let (_dir, app) = test_app().await;

        let body = r#"{"owner_id":"user-1","symptoms":"rash","image":{"file_name":"rash.jpg","data":"not base64!!"}}"#;
        let req = json_request("POST", "/api/submissions", body);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("invalid image encoding"));
    }

    #[tokio::test]
    async fn submissions_create_rejects_empty_symptoms() {
        let (_dir, app) = test_app().await;

        let body = r#"{"owner_id":"user-1","symptoms":""}"#;
        let req = json_request("POST", "/api/submissions", body);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (_dir, app) = test_app().await;

        let req = Request::builder()
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
