//! One-shot analysis endpoint.
//!
//! `POST /api/analyze` takes the full text to analyze and returns the
//! reply text. Callers that keep their own transcript fold it into
//! `symptoms` themselves; stateful conversations go through
//! `/api/chat/send` instead.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::state::AppState;
use crate::triage::client::AnalyzeBackend;
use crate::triage::parser::extract_reply;
use crate::triage::prompt::{render_context, SYSTEM_PROMPT};
use crate::triage::types::ConversationContext;
use crate::triage::TriageError;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub symptoms: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub content: String,
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.symptoms.trim().is_empty() {
        return Err(TriageError::EmptyInput.into());
    }

    // The backend client is blocking; never call it on a runtime thread.
    let content = tokio::task::spawn_blocking(move || -> Result<String, TriageError> {
        let context = ConversationContext::single(&req.symptoms);
        let raw = state
            .backend
            .complete(SYSTEM_PROMPT, &render_context(&context))?;
        Ok(extract_reply(&raw).content)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))??;

    Ok(Json(AnalyzeResponse { content }))
}
