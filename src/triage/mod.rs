pub mod client;
pub mod conversation;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod orchestrator;

use thiserror::Error;

use crate::db::DatabaseError;

/// Failure taxonomy for the triage engine.
///
/// `MissingCredential` is a configuration error: fatal for the request,
/// raised before any network call. `EmptyInput` is a validation error,
/// also raised before any backend call. The backend variants are
/// recoverable: the caller shows a generic message and may re-prompt.
/// None of these trigger a retry anywhere.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("analysis backend credential is not configured")]
    MissingCredential,

    #[error("please describe your symptoms")]
    EmptyInput,

    #[error("analysis backend returned error (status {status}): {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("analysis backend returned no usable content")]
    EmptyResponse,

    #[error("response decoding error: {0}")]
    ResponseDecoding(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

impl TriageError {
    /// Whether the error happened before any backend call was attempted.
    pub fn is_pre_backend(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::EmptyInput)
    }
}
