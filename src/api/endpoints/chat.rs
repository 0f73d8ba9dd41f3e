//! Conversational triage endpoints.
//!
//! `POST /api/chat/send` runs one turn of a session. An absent or
//! unknown `session_id` starts a fresh conversation; the returned id
//! is what the client sends on the next turn. `DELETE
//! /api/chat/sessions/:id` ends a session and discards its transcript.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::enums::Phase;
use crate::models::TriageAssessment;
use crate::state::{AppState, StateError};
use crate::triage::orchestrator::TriagePipeline;
use crate::triage::types::AnalysisReply;
use crate::triage::TriageError;

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatSendResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub phase: Phase,
    pub assessment: TriageAssessment,
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatSendRequest>,
) -> Result<Json<ChatSendResponse>, ApiError> {
    // Validated before the session lookup: an invalid request must not
    // register an orphan tracker in the sessions map.
    if req.message.trim().is_empty() {
        return Err(TriageError::EmptyInput.into());
    }

    let (session_id, tracker) = state.session(req.session_id)?;

    // One turn per session at a time: the session lock is held across
    // the whole backend call. Other sessions are unaffected.
    let (reply, phase) = tokio::task::spawn_blocking(
        move || -> Result<(AnalysisReply, Phase), ApiError> {
            let mut tracker = tracker.lock().map_err(|_| StateError::LockPoisoned)?;
            let pipeline = TriagePipeline::new(&state.backend);
            let reply = pipeline.respond(&mut tracker, &req.message)?;
            Ok((reply, tracker.phase()))
        },
    )
    .await
    .map_err(|e| ApiError::Internal(format!("chat task failed: {e}")))??;

    Ok(Json(ChatSendResponse {
        session_id,
        reply: reply.content,
        phase,
        assessment: reply.assessment,
    }))
}

pub async fn end(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.end_session(session_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Session not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    async fn test_state() -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        let state = tokio::task::spawn_blocking(move || {
            AppState::new(AppConfig::for_tests(data_dir)).unwrap()
        })
        .await
        .unwrap();
        (dir, Arc::new(state))
    }

    #[tokio::test]
    async fn invalid_message_does_not_register_a_session() {
        let (_dir, state) = test_state().await;

        let result = send(
            State(Arc::clone(&state)),
            Json(ChatSendRequest {
                session_id: None,
                message: "   ".into(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        // A rejected request must not leave an orphan tracker behind.
        assert_eq!(state.session_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_analysis_keeps_exactly_one_session() {
        // No credential is configured, so the turn fails at the
        // backend; the session it ran in must survive for a retry.
        let (_dir, state) = test_state().await;

        let result = send(
            State(Arc::clone(&state)),
            Json(ChatSendRequest {
                session_id: None,
                message: "fever".into(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Configuration)));
        assert_eq!(state.session_count().unwrap(), 1);
    }
}
