pub mod assessment;
pub mod conversation;
pub mod enums;
pub mod submission;

pub use assessment::TriageAssessment;
pub use conversation::ConversationTurn;
pub use submission::{SubmissionIntake, SubmissionRecord};
