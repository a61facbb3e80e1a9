//! Grounding checks on generator candidates and the fallback decision.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::flags::{Severity, TaggedFlags};
use crate::parse::CandidateQuestion;

const ID_PATTERN: &str = r"(?:text_flag|missing_info|photo_issue|student_concern)_\d+";

/// Bracketed id citation such as `(text_flag_0)` or `[text_flag_0, photo_issue_1]`.
static CITED_IDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\s*[\(\[]\s*{ID_PATTERN}(?:\s*,\s*{ID_PATTERN})*\s*[\)\]]"
    ))
    .ok()
});

/// Id used as a word of the sentence.
static INLINE_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"\b{ID_PATTERN}\b")).ok());

/// Display group of a question, derived from its first flag id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    ListingDescription,
    MissingDetails,
    Photos,
    StudentConcerns,
    General,
    ComprehensiveReview,
}

impl QuestionCategory {
    pub fn from_flag_ids(ids: &[String]) -> Self {
        let Some(first) = ids.first() else {
            return QuestionCategory::General;
        };
        if first.starts_with("text_flag") {
            QuestionCategory::ListingDescription
        } else if first.starts_with("missing_info") {
            QuestionCategory::MissingDetails
        } else if first.starts_with("photo_issue") {
            QuestionCategory::Photos
        } else if first.starts_with("student_concern") {
            QuestionCategory::StudentConcerns
        } else {
            QuestionCategory::General
        }
    }
}

/// Landlord-facing question. `flag_ids` is never empty and only cites ids of
/// the request it was produced for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub flag_ids: Vec<String>,
    pub priority: Severity,
    pub category: QuestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Why a candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NoFlagIds,
    UnknownFlagIds,
    BlankQuestion,
    InlineFlagId,
}

/// Candidate that failed grounding or carried no usable text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCandidate {
    pub question: String,
    pub invalid_ids: Vec<String>,
    pub reason: RejectionReason,
}

/// Per-request validation outcome, kept for audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub accepted: Vec<Question>,
    pub rejected: Vec<RejectedCandidate>,
}

impl ValidationReport {
    pub fn hallucinations(&self) -> usize {
        self.rejected.len()
    }

    /// Every unknown id cited by any rejected candidate.
    pub fn invalid_ids(&self) -> Vec<&str> {
        self.rejected
            .iter()
            .flat_map(|r| r.invalid_ids.iter().map(String::as_str))
            .collect()
    }
}

/// Why the deterministic fallback question was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    NoValidQuestions,
    TooManyHallucinations { rejected: usize, accepted: usize },
    LowCoverage { accepted: usize, total_flags: usize },
    GenerationFailed { error: String },
    ModelUnavailable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoValidQuestions => f.write_str("generator produced 0 valid questions"),
            FallbackReason::TooManyHallucinations { rejected, accepted } => write!(
                f,
                "too many hallucinations ({rejected} rejected vs {accepted} valid)"
            ),
            FallbackReason::LowCoverage {
                accepted,
                total_flags,
            } => write!(
                f,
                "low coverage: {accepted} questions for {total_flags} flags"
            ),
            FallbackReason::GenerationFailed { error } => {
                write!(f, "generation failed: {error}")
            }
            FallbackReason::ModelUnavailable => f.write_str("no generation model configured"),
        }
    }
}

/// Splits candidates into accepted questions and rejections.
///
/// A candidate is accepted iff it cites at least one id, every cited id is a
/// tagged flag, and its text is still a usable question once bracketed id
/// citations are stripped. Ids spliced into the sentence itself reject the
/// candidate. Every rejection counts towards the hallucination rule.
pub fn validate(candidates: Vec<CandidateQuestion>, tagged: &TaggedFlags) -> ValidationReport {
    let mut report = ValidationReport::default();

    for c in candidates {
        let invalid_ids: Vec<String> = c
            .flag_ids
            .iter()
            .filter(|id| !tagged.contains(id))
            .cloned()
            .collect();

        let text = scrub_flag_ids(&c.question);
        let reason = if c.flag_ids.is_empty() {
            Some(RejectionReason::NoFlagIds)
        } else if !invalid_ids.is_empty() {
            Some(RejectionReason::UnknownFlagIds)
        } else if text.is_empty() {
            Some(RejectionReason::BlankQuestion)
        } else if has_inline_flag_id(&text) {
            Some(RejectionReason::InlineFlagId)
        } else {
            None
        };

        if let Some(reason) = reason {
            warn!(
                question = %c.question.chars().take(50).collect::<String>(),
                ?invalid_ids,
                ?reason,
                cited = c.flag_ids.len(),
                "rejected question candidate"
            );
            report.rejected.push(RejectedCandidate {
                question: c.question,
                invalid_ids,
                reason,
            });
            continue;
        }

        if text.len() != c.question.trim().len() {
            debug!(flag_ids = ?c.flag_ids, "stripped id citations from question text");
        }
        report.accepted.push(Question {
            category: QuestionCategory::from_flag_ids(&c.flag_ids),
            text,
            flag_ids: c.flag_ids,
            priority: c.priority,
            reasoning: c.reasoning.filter(|r| !r.trim().is_empty()),
        });
    }
    report
}

/// Fallback rules, in order: nothing accepted; more rejected than
/// accepted; under half the flags covered on a set of three or more.
pub fn fallback_decision(report: &ValidationReport, total_flags: usize) -> Option<FallbackReason> {
    let accepted = report.accepted.len();
    let rejected = report.hallucinations();

    if accepted == 0 && total_flags > 0 {
        return Some(FallbackReason::NoValidQuestions);
    }
    if rejected > accepted {
        return Some(FallbackReason::TooManyHallucinations { rejected, accepted });
    }
    let coverage = accepted as f64 / total_flags.max(1) as f64;
    if coverage < 0.5 && total_flags >= 3 {
        return Some(FallbackReason::LowCoverage {
            accepted,
            total_flags,
        });
    }
    None
}

/// Removes bracketed flag id citations from question text.
pub fn scrub_flag_ids(text: &str) -> String {
    match CITED_IDS.as_ref() {
        Some(re) => re.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

fn has_inline_flag_id(text: &str) -> bool {
    INLINE_ID.as_ref().is_some_and(|re| re.is_match(text))
}
