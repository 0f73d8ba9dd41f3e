//! API error types with HTTP status mapping.
//!
//! The wire shape is a flat JSON object: `{"error": "<message>"}`.
//! Backend and decoding failures are logged with full detail but the
//! client only sees a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::StateError;
use crate::submission::SubmissionError;
use crate::triage::TriageError;

/// Flat error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Analysis backend credential is not configured")]
    Configuration,
    #[error("Analysis failed: {0}")]
    Analysis(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Configuration => {
                tracing::error!("analysis requested without a configured credential");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OpenAI API key not configured. Please contact the administrator.".to_string(),
                )
            }
            ApiError::Analysis(detail) => {
                tracing::error!(detail, "symptom analysis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to analyze symptoms".to_string(),
                )
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::EmptyInput => {
                ApiError::BadRequest("Symptoms description cannot be empty".into())
            }
            TriageError::MissingCredential => ApiError::Configuration,
            TriageError::Database(e) => ApiError::Internal(e.to_string()),
            other => ApiError::Analysis(other.to_string()),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Triage(e) => e.into(),
            SubmissionError::Upload(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_detail() {
        let response = ApiError::BadRequest("Symptoms description cannot be empty".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Symptoms description cannot be empty");
    }

    #[tokio::test]
    async fn configuration_returns_500_with_admin_message() {
        let response = ApiError::Configuration.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "OpenAI API key not configured. Please contact the administrator."
        );
    }

    #[tokio::test]
    async fn analysis_failure_hides_detail() {
        let response = ApiError::Analysis("status 503: upstream down".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to analyze symptoms");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn error_body_is_flat() {
        let response = ApiError::NotFound("Session not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn empty_input_maps_to_bad_request() {
        let api: ApiError = TriageError::EmptyInput.into();
        assert!(matches!(api, ApiError::BadRequest(_)));
    }

    #[test]
    fn missing_credential_maps_to_configuration() {
        let api: ApiError = TriageError::MissingCredential.into();
        assert!(matches!(api, ApiError::Configuration));
    }

    #[test]
    fn backend_failure_maps_to_analysis() {
        let api: ApiError = TriageError::Backend {
            status: 503,
            body: "unavailable".into(),
        }
        .into();
        assert!(matches!(api, ApiError::Analysis(_)));
    }
}
