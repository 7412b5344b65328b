//! # Response Validation
//!
//! Turns a provider's raw message content into a validated
//! [`AiAnalysis`]. Providers are instructed to return bare JSON, but some
//! wrap it in markdown code fences anyway; fences are stripped first, then
//! the JSON must parse and every field must pass strict validation. An
//! out-of-range confidence is rejected, never clamped: a provider emitting
//! nonsense should fail the attempt, not be laundered into a plausible
//! record.

use serde::Deserialize;

use fairwork_core::{AiAnalysis, Recommendation, Timestamp};

#[derive(Deserialize)]
struct RawAnalysis {
    recommendation: String,
    confidence: i64,
    summary: String,
    reasoning: Vec<String>,
}

/// Strip a leading/trailing markdown code fence, if present.
///
/// Handles ```` ```json ```` and bare ```` ``` ```` fences; anything else
/// passes through untouched.
pub fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // drop an optional language tag on the opening fence line
    match body.split_once('\n') {
        Some((first, tail)) if !first.trim().is_empty() && !first.trim().starts_with('{') => {
            tail.trim()
        }
        _ => body.trim(),
    }
}

/// Parse and validate a provider response into an [`AiAnalysis`].
///
/// The failure reason string feeds the router's per-provider failure
/// report.
pub fn parse_analysis(content: &str) -> Result<AiAnalysis, String> {
    let stripped = strip_fences(content);
    let raw: RawAnalysis = serde_json::from_str(stripped)
        .map_err(|e| format!("response is not the expected JSON shape: {e}"))?;

    let recommendation = match raw.recommendation.as_str() {
        "CLIENT" => Recommendation::Client,
        "FREELANCER" => Recommendation::Freelancer,
        "NEUTRAL" => Recommendation::Neutral,
        other => return Err(format!("unknown recommendation {other:?}")),
    };
    let confidence: u8 = raw
        .confidence
        .try_into()
        .ok()
        .filter(|c| *c <= 100)
        .ok_or_else(|| format!("confidence {} outside 0..=100", raw.confidence))?;

    AiAnalysis::new(
        recommendation,
        confidence,
        raw.summary,
        raw.reasoning,
        Timestamp::now(),
    )
    .map_err(|e| e.to_string())
}
