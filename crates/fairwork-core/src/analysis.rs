//! # AI Arbitration Analysis
//!
//! [`AiAnalysis`] is the validated record produced by an arbitration
//! provider: a recommendation, a confidence score, and a human-readable
//! rationale. The record is advisory only. It never resolves a dispute by
//! itself; jurors see it alongside the raw evidence.
//!
//! Construction goes through [`AiAnalysis::new`], which rejects any
//! malformed field. An invalid analysis record can never exist in memory,
//! so downstream code (storage, HTTP serialization, jury display) takes
//! the fields at face value.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::temporal::Timestamp;

/// Which party an arbitration analysis favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// The client's position is better supported by the evidence.
    Client,
    /// The freelancer's position is better supported by the evidence.
    Freelancer,
    /// The evidence does not clearly favor either party.
    Neutral,
}

impl Recommendation {
    /// Canonical wire name for this recommendation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Client => "CLIENT",
            Recommendation::Freelancer => "FREELANCER",
            Recommendation::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated arbitration analysis.
///
/// Fields are private; read access goes through the accessor methods so the
/// validated invariants (confidence bound, non-empty rationale) cannot be
/// broken after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnalysis {
    recommendation: Recommendation,
    confidence: u8,
    summary: String,
    reasoning: Vec<String>,
    analyzed_at: Timestamp,
}

impl AiAnalysis {
    /// Build a validated analysis record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAnalysis`] if:
    /// - `confidence` exceeds 100 (out-of-range scores are rejected, not
    ///   clamped, so a provider emitting nonsense is surfaced rather than
    ///   laundered into a plausible number),
    /// - `summary` is empty or whitespace-only,
    /// - `reasoning` is empty or contains an empty entry.
    pub fn new(
        recommendation: Recommendation,
        confidence: u8,
        summary: impl Into<String>,
        reasoning: Vec<String>,
        analyzed_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if confidence > 100 {
            return Err(ValidationError::InvalidAnalysis(format!(
                "confidence {confidence} outside 0..=100"
            )));
        }
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err(ValidationError::InvalidAnalysis(
                "summary must be non-empty".to_string(),
            ));
        }
        if reasoning.is_empty() {
            return Err(ValidationError::InvalidAnalysis(
                "reasoning must contain at least one point".to_string(),
            ));
        }
        if reasoning.iter().any(|r| r.trim().is_empty()) {
            return Err(ValidationError::InvalidAnalysis(
                "reasoning entries must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            recommendation,
            confidence,
            summary,
            reasoning,
            analyzed_at,
        })
    }

    /// The recommended outcome.
    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    /// Confidence score in `0..=100`.
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    /// One-paragraph summary of the recommendation.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Individual reasoning points, in provider order.
    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    /// When the analysis was produced.
    pub fn analyzed_at(&self) -> Timestamp {
        self.analyzed_at
    }
}
