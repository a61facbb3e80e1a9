//! Inbound analysis request.

use landlord_questions::{MissingInfoRecord, PhotoIssueRecord, RedFlagRecord};
use serde::Deserialize;
use student_sentiment::RawComment;

/// Everything the upstream analyzers and the comment collector produced for
/// one listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub listing_text: Option<String>,
    /// Text analyzer verdict: `low` / `medium` / `high`.
    #[serde(default)]
    pub overall_risk: Option<String>,
    /// Photo quality on a 0-10 scale, 10 being best.
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub comments: Vec<RawComment>,
    #[serde(default)]
    pub red_flags: Vec<RedFlagRecord>,
    #[serde(default)]
    pub missing_info: Vec<MissingInfoRecord>,
    #[serde(default)]
    pub photo_issues: Vec<PhotoIssueRecord>,
}
