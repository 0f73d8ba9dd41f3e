//! Submission endpoints.
//!
//! `POST /api/submissions` runs a one-shot analysis over an intake
//! form and persists the result; an optional image arrives base64
//! encoded and only its stored reference reaches the record. `GET
//! /api/submissions` lists a user's history, newest first.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::models::{SubmissionIntake, SubmissionRecord, TriageAssessment};
use crate::state::AppState;
use crate::submission::media::MediaUpload;
use crate::submission::{SubmissionOutcome, SubmissionService};

#[derive(Deserialize)]
pub struct ImagePayload {
    pub file_name: String,
    /// Standard base64, no data-URL prefix.
    pub data: String,
}

#[derive(Deserialize)]
pub struct SubmissionRequest {
    pub owner_id: String,
    #[serde(flatten)]
    pub intake: SubmissionIntake,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub content: String,
    pub assessment: TriageAssessment,
    pub record: Option<SubmissionRecord>,
    /// Set when the analysis succeeded but the record write failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmissionRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    if req.owner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("owner_id is required".into()));
    }

    let image = match &req.image {
        Some(payload) => Some(MediaUpload {
            file_name: payload.file_name.clone(),
            bytes: base64::engine::general_purpose::STANDARD
                .decode(&payload.data)
                .map_err(|e| ApiError::BadRequest(format!("invalid image encoding: {e}")))?,
        }),
        None => None,
    };

    let outcome = tokio::task::spawn_blocking(
        move || -> Result<SubmissionOutcome, ApiError> {
            let conn = state.open_db()?;
            let service = SubmissionService::new(&state.backend, &conn);
            Ok(service.submit(&req.owner_id, &req.intake, image.as_ref(), &state.media)?)
        },
    )
    .await
    .map_err(|e| ApiError::Internal(format!("submission task failed: {e}")))??;

    Ok(Json(SubmissionResponse {
        content: outcome.reply.content,
        assessment: outcome.reply.assessment,
        record: outcome.record,
        save_error: outcome.save_error,
    }))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub owner_id: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub submissions: Vec<SubmissionRecord>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    if query.owner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("owner_id is required".into()));
    }

    let submissions = tokio::task::spawn_blocking(
        move || -> Result<Vec<SubmissionRecord>, ApiError> {
            let conn = state.open_db()?;
            let history = crate::history::HistoryService::new(&conn);
            Ok(history.list(&query.owner_id, &query.search)?)
        },
    )
    .await
    .map_err(|e| ApiError::Internal(format!("history task failed: {e}")))??;

    Ok(Json(HistoryResponse { submissions }))
}
