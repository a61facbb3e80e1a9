//! Untyped generator text → candidate questions.
//!
//! Only structure is checked here; grounding lives in [`crate::validate`].

use serde::{Deserialize, Serialize};

use crate::errors::QuestionError;
use crate::flags::Severity;

/// One generator proposal, not yet checked against the flag ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub flag_ids: Vec<String>,
    #[serde(default)]
    pub priority: Severity,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    #[serde(default)]
    pub questions: Vec<CandidateQuestion>,
}

/// Removes a surrounding Markdown code fence, whatever its info string.
pub fn cleanup_json_like(s: &str) -> String {
    let t = s.trim();
    let Some(fenced) = t.strip_prefix("```") else {
        return t.to_string();
    };
    // The opening fence line (info string included) is dropped whole.
    let body = match fenced.split_once('\n') {
        Some((_, rest)) => rest,
        None => fenced,
    };
    let body = match body.rfind("```") {
        Some(pos) => &body[..pos],
        None => body,
    };
    body.trim().to_string()
}

/// Parses a (possibly fenced) `{"questions": [...]}` payload.
pub fn parse_candidates(raw: &str) -> Result<CandidateSet, QuestionError> {
    let clean = cleanup_json_like(raw);
    Ok(serde_json::from_str(&clean)?)
}
