use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::TriageAssessment;
use super::enums::Gender;

/// Persisted, immutable snapshot of one completed intake + assessment.
///
/// Identity is the store-assigned `id`; `created_at` comes from the
/// store's clock so ordering stays consistent across clients with
/// skewed clocks. No update or delete operation exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub symptoms: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub temperature: String,
    pub blood_pressure: String,
    /// Opaque reference from the upload collaborator; empty when no
    /// image was supplied. Never raw bytes.
    pub image_ref: String,
    pub assessment: TriageAssessment,
    pub created_at: NaiveDateTime,
}

/// Intake form fields as supplied by the user. Everything except
/// `symptoms` is optional free text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionIntake {
    pub symptoms: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub blood_pressure: String,
}
