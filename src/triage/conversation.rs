use uuid::Uuid;

use super::types::ConversationContext;
use super::TriageError;
use crate::models::enums::{Phase, Sender};
use crate::models::ConversationTurn;

/// Fixed greeting that opens every new session.
pub const GREETING: &str =
    "Hi there! I'm MediBot, your healthcare assistant. How can I help you today?";

/// Ordered turn sequence for one active session.
///
/// Lives in memory only: created on the first user message, dropped when
/// the user starts a new session. The phase is advisory: it records
/// whether a confident assessment has been delivered, and only moves
/// forward.
pub struct ConversationTracker {
    session_id: Uuid,
    turns: Vec<ConversationTurn>,
    phase: Phase,
    /// Sliding-window cap on prior turns included in the rolling context.
    max_context_turns: usize,
}

impl ConversationTracker {
    pub fn new(max_context_turns: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            turns: vec![ConversationTurn::new(Sender::Assistant, GREETING)],
            phase: Phase::Gathering,
            max_context_turns,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Append a user turn. Empty or whitespace-only input is rejected
    /// before anything reaches the backend.
    pub fn append_user_turn(&mut self, text: &str) -> Result<Uuid, TriageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TriageError::EmptyInput);
        }
        let turn = ConversationTurn::new(Sender::User, text);
        let id = turn.id;
        self.turns.push(turn);
        Ok(id)
    }

    /// Append an assistant turn. Follows every analysis attempt; on
    /// failure the caller appends the fixed apology text instead of
    /// backend output.
    pub fn append_assistant_turn(&mut self, text: &str) -> Uuid {
        let turn = ConversationTurn::new(Sender::Assistant, text);
        let id = turn.id;
        self.turns.push(turn);
        id
    }

    /// Build the rolling context for the next analysis call.
    ///
    /// The newest user message becomes the current message; prior turns
    /// within the sliding window are split by sender into two ordered
    /// blocks. Must be called after `append_user_turn`.
    pub fn build_context(&self) -> ConversationContext {
        let current = self
            .turns
            .iter()
            .rev()
            .find(|t| t.sender == Sender::User)
            .map(|t| t.content.clone())
            .unwrap_or_default();

        let prior: Vec<&ConversationTurn> = self
            .turns
            .iter()
            .take(self.turns.len().saturating_sub(1))
            .collect();
        let windowed = &prior[prior.len().saturating_sub(self.max_context_turns)..];

        ConversationContext {
            prior_user: windowed
                .iter()
                .filter(|t| t.sender == Sender::User)
                .map(|t| t.content.clone())
                .collect(),
            prior_assistant: windowed
                .iter()
                .filter(|t| t.sender == Sender::Assistant)
                .map(|t| t.content.clone())
                .collect(),
            current,
        }
    }

    /// Record that a confident assessment has been delivered. The phase
    /// never moves back to gathering for this session.
    pub fn confirm(&mut self) {
        self.phase = Phase::Confirmed;
    }
}
