//! # Case Prompt Construction
//!
//! Builds the analysis prompt sent to every provider. The prompt is a pure
//! function of the case evidence: fixed instruction header, the four case
//! sections in fixed order, fixed output-format trailer. Equal inputs
//! produce byte-identical prompts, which keeps provider fallback fair (each
//! provider in the chain sees exactly the same case) and makes prompts
//! reproducible after the fact.

use serde::{Deserialize, Serialize};

/// The evidence bundle for one dispute, already flattened to text.
///
/// The caller (the API layer) renders job fields and evidence lists into
/// these four strings; the arbiter never reaches back into engine records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEvidence {
    /// What the job asked for.
    pub job_description: String,
    /// What the freelancer submitted.
    pub deliverable: String,
    /// The client's evidence, one item per line.
    pub client_evidence: String,
    /// The freelancer's evidence, one item per line.
    pub freelancer_evidence: String,
}

/// Instruction header prepended to every case.
const HEADER: &str = "\
You are a neutral arbitration analyst for a freelance escrow marketplace. \
A client and a freelancer disagree about a submitted deliverable. Review \
the dispute data below impartially and assess which party's position is \
better supported. Your analysis is advisory input for a human jury; do not \
assume it decides the dispute.

Respond with a JSON object containing exactly these fields:
  \"recommendation\": \"CLIENT\" | \"FREELANCER\" | \"NEUTRAL\"
  \"confidence\": an integer from 0 to 100
  \"summary\": one paragraph summarizing your assessment
  \"reasoning\": an array of strings, one per distinct reasoning point";

/// Output-format reminder appended after the case sections.
const TRAILER: &str =
    "Now analyze this dispute and return ONLY valid JSON (no markdown, no code blocks).";

/// Render the full prompt for a case. Deterministic: equal evidence yields
/// a byte-identical prompt.
pub fn build_prompt(case: &CaseEvidence) -> String {
    format!(
        "{HEADER}\n\n\
         ## DISPUTE DATA\n\n\
         ### Job Description\n{}\n\n\
         ### Deliverable Submitted\n{}\n\n\
         ### Client Evidence\n{}\n\n\
         ### Freelancer Evidence\n{}\n\n\
         {TRAILER}",
        case.job_description, case.deliverable, case.client_evidence, case.freelancer_evidence
    )
}
