use super::client::AnalyzeBackend;
use super::conversation::ConversationTracker;
use super::parser::extract_reply;
use super::prompt::{render_context, SYSTEM_PROMPT};
use super::types::AnalysisReply;
use super::TriageError;

/// Fixed apology turn appended when an analysis attempt fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Closing line of the formatted assessment reply.
const CLOSING_PROMPT: &str = "Would you like to add more symptoms or details for better accuracy?";

/// One conversation turn end to end: validate input, assemble the
/// rolling context, call the backend once, extract the assessment and
/// append the assistant turn.
pub struct TriagePipeline<'a, B: AnalyzeBackend> {
    backend: &'a B,
}

impl<'a, B: AnalyzeBackend> TriagePipeline<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Process one user message against the session's tracker.
    ///
    /// On backend failure the fixed apology turn is appended and the
    /// error propagates with no retry and no partial state. Validation
    /// failures append nothing.
    pub fn respond(
        &self,
        tracker: &mut ConversationTracker,
        text: &str,
    ) -> Result<AnalysisReply, TriageError> {
        tracker.append_user_turn(text)?;

        let context = tracker.build_context();
        let prompt = render_context(&context);

        let raw = match self.backend.complete(SYSTEM_PROMPT, &prompt) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, session = %tracker.session_id(), "analysis failed");
                tracker.append_assistant_turn(APOLOGY);
                return Err(e);
            }
        };

        let mut reply = extract_reply(&raw);
        if reply.assessment.confidence_met {
            reply.content = format_assessment_reply(&reply);
            tracker.confirm();
        }
        tracker.append_assistant_turn(&reply.content);

        Ok(reply)
    }
}

/// Render a confident assessment into the assistant turn shown to the
/// user: condition, severity, risk level and recommendations.
fn format_assessment_reply(reply: &AnalysisReply) -> String {
    let a = &reply.assessment;
    let mut out = String::from("Based on your symptoms, here's what I found:\n\n");

    if let Some(condition) = &a.condition {
        out.push_str(&format!("Condition: {condition}\n"));
    }
    if let Some(severity) = a.severity {
        out.push_str(&format!("Severity: {}\n", severity.as_str()));
    }
    out.push_str(&format!("Risk Level: {}\n", a.risk_level.as_str()));

    out.push_str("\nRecommendations:\n");
    for rec in &a.recommendations {
        out.push_str(&format!("- {rec}\n"));
    }

    out.push('\n');
    out.push_str(CLOSING_PROMPT);
    out
}
