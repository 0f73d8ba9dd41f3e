pub mod media;

use rusqlite::Connection;
use thiserror::Error;

use crate::db::repository;
use crate::models::{SubmissionIntake, SubmissionRecord};
use crate::triage::client::AnalyzeBackend;
use crate::triage::parser::extract_reply;
use crate::triage::prompt::{render_context, SYSTEM_PROMPT};
use crate::triage::types::{AnalysisReply, ConversationContext};
use crate::triage::TriageError;

use media::{MediaError, MediaStore, MediaUpload};

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Triage(#[from] TriageError),

    #[error("media upload failed: {0}")]
    Upload(#[from] MediaError),
}

/// What a submission attempt yields once the analysis has succeeded.
///
/// The assessment is always present; `record` is `None` when the store
/// write failed. A persistence failure happens only after a successful
/// analysis, so the computed assessment is never discarded.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub reply: AnalysisReply,
    pub record: Option<SubmissionRecord>,
    pub save_error: Option<String>,
}

/// Builds one persistable record out of intake fields, a fresh
/// assessment and an optional media reference.
pub struct SubmissionService<'a, B: AnalyzeBackend> {
    backend: &'a B,
    conn: &'a Connection,
}

impl<'a, B: AnalyzeBackend> SubmissionService<'a, B> {
    pub fn new(backend: &'a B, conn: &'a Connection) -> Self {
        Self { backend, conn }
    }

    /// Run one complete submission.
    ///
    /// Order matters: symptoms are validated before the backend is
    /// invoked (exactly one call per valid submission, none for invalid
    /// input); the upload collaborator runs before the record is built
    /// so only its reference string is stored; the record is written in
    /// a single atomic insert with a store-assigned timestamp.
    pub fn submit<M: MediaStore>(
        &self,
        owner_id: &str,
        intake: &SubmissionIntake,
        image: Option<&MediaUpload>,
        media: &M,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if intake.symptoms.trim().is_empty() {
            return Err(TriageError::EmptyInput.into());
        }

        let context = ConversationContext::single(&intake.symptoms);
        let raw = self
            .backend
            .complete(SYSTEM_PROMPT, &render_context(&context))
            .map_err(SubmissionError::Triage)?;
        let reply = extract_reply(&raw);

        let image_ref = match image {
            Some(upload) => media.store(owner_id, upload)?,
            None => String::new(),
        };

        match repository::insert_submission(
            self.conn,
            owner_id,
            intake,
            &image_ref,
            &reply.assessment,
        ) {
            Ok(record) => Ok(SubmissionOutcome {
                reply,
                record: Some(record),
                save_error: None,
            }),
            Err(e) => {
                // The assessment was already computed; surface it with
                // the save failure instead of dropping it.
                tracing::error!(error = %e, owner_id, "submission store write failed");
                Ok(SubmissionOutcome {
                    reply,
                    record: None,
                    save_error: Some(e.to_string()),
                })
            }
        }
    }
}
