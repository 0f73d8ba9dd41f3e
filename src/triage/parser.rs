use std::str::FromStr;

use super::types::AnalysisReply;
use crate::models::enums::{RiskLevel, Severity};
use crate::models::TriageAssessment;

/// Extract the structured assessment from a backend response.
///
/// This is the system's weakest boundary, so extraction never fails:
/// any missing or malformed field becomes absent, an unparseable
/// response yields a default assessment (medium risk, no
/// recommendations, confidence not met) with the raw text as the reply.
/// The confidence gate is enforced on whatever comes out.
pub fn extract_reply(raw: &str) -> AnalysisReply {
    let (assessment, content) = match extract_json_block(raw) {
        Some((json, remainder)) => {
            let assessment = parse_assessment_json(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "backend JSON block did not parse, treating as prose");
                TriageAssessment::default()
            });
            let content = if remainder.is_empty() {
                raw.trim().to_string()
            } else {
                remainder
            };
            (assessment, content)
        }
        None => match raw.find("```json") {
            // Opening fence with no close: half-emitted output. Try the
            // fragment as JSON, and never let the marker or the
            // fragment reach the user as reply text.
            Some(fence_start) => {
                let fragment = raw[fence_start + 7..].trim();
                let assessment = parse_assessment_json(fragment).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "dangling JSON fence in backend response");
                    TriageAssessment::default()
                });
                (assessment, raw[..fence_start].trim().to_string())
            }
            // Some strict-mode backends return a bare JSON object with
            // no fence at all.
            None => match parse_assessment_json(raw.trim()) {
                Ok(assessment) => (assessment, raw.trim().to_string()),
                Err(_) => (TriageAssessment::default(), raw.trim().to_string()),
            },
        },
    };

    AnalysisReply {
        content,
        assessment: assessment.normalize(),
    }
}

/// Split a response into its fenced JSON block and the trailing reply.
fn extract_json_block(response: &str) -> Option<(String, String)> {
    let json_start = response.find("```json")?;
    let json_content_start = json_start + 7;
    let json_end = response[json_content_start..].find("```")?;

    let json = response[json_content_start..json_content_start + json_end]
        .trim()
        .to_string();

    let remainder_start = json_content_start + json_end + 3;
    let remainder = if remainder_start < response.len() {
        response[remainder_start..].trim().to_string()
    } else {
        String::new()
    };

    Some((json, remainder))
}

fn parse_assessment_json(json: &str) -> Result<TriageAssessment, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let condition = value
        .get("condition")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(String::from);

    let severity = value
        .get("severity")
        .and_then(|v| v.as_str())
        .and_then(parse_severity);

    let risk_level = value
        .get("risk_level")
        .and_then(|v| v.as_str())
        .and_then(parse_risk_level)
        .unwrap_or_default();

    let recommendations = value
        .get("recommendations")
        .and_then(|v| v.as_array())
        .map(|items| {
            // Lenient: skip non-string or blank entries instead of failing.
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let confidence_met = value
        .get("confidence_met")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Ok(TriageAssessment {
        condition,
        severity,
        risk_level,
        recommendations,
        confidence_met,
    })
}

fn parse_severity(s: &str) -> Option<Severity> {
    let s = s.trim();
    Severity::from_str(s)
        .ok()
        .or_else(|| match s.to_ascii_lowercase().as_str() {
            "mild" => Some(Severity::Mild),
            "moderate" => Some(Severity::Moderate),
            "severe" => Some(Severity::Severe),
            "emergency" => Some(Severity::Emergency),
            _ => None,
        })
}

fn parse_risk_level(s: &str) -> Option<RiskLevel> {
    RiskLevel::from_str(s.trim().to_ascii_lowercase().as_str()).ok()
}
