use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Sender;

/// One message in a triage conversation. Immutable once created;
/// the owning session appends turns and never edits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub created_at: NaiveDateTime,
}

impl ConversationTurn {
    pub fn new(sender: Sender, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            sender,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}
