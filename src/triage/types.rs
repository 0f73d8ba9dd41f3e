use serde::Serialize;

use crate::models::TriageAssessment;

/// Rolling context handed to the analysis client: prior turns split by
/// sender, plus the newest user message as the current one.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    pub prior_user: Vec<String>,
    pub prior_assistant: Vec<String>,
    pub current: String,
}

impl ConversationContext {
    /// Context for a one-shot analysis with no conversation history
    /// (the submission flow and the bare analyze endpoint).
    pub fn single(text: &str) -> Self {
        Self {
            prior_user: vec![],
            prior_assistant: vec![],
            current: text.to_string(),
        }
    }

    pub fn has_history(&self) -> bool {
        !self.prior_user.is_empty() || !self.prior_assistant.is_empty()
    }
}

/// What one analysis call produces: the backend's reply text plus the
/// structured assessment defensively extracted from it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReply {
    pub content: String,
    pub assessment: TriageAssessment,
}
