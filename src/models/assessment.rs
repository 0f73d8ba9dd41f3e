use serde::{Deserialize, Serialize};

use super::enums::{RiskLevel, Severity};

/// Structured triage result produced by the analysis client.
///
/// Invariants (enforced by [`TriageAssessment::normalize`], never trusted
/// from the backend):
/// - `condition` and `severity` are `None` unless `confidence_met`.
/// - `recommendations` is non-empty whenever `confidence_met`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageAssessment {
    pub condition: Option<String>,
    pub severity: Option<Severity>,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub confidence_met: bool,
}

impl TriageAssessment {
    /// Enforce the confidence gate on a backend-supplied assessment.
    ///
    /// A claimed diagnosis without the confidence flag is dropped, and a
    /// confident assessment without recommendations is demoted: the
    /// backend is instructed to always recommend next steps, so their
    /// absence means the structured output cannot be trusted.
    pub fn normalize(mut self) -> Self {
        if self.confidence_met && self.recommendations.is_empty() {
            self.confidence_met = false;
        }
        if !self.confidence_met {
            self.condition = None;
            self.severity = None;
        }
        self
    }
}
