//! Comment and review value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentiment label attached to one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic a comment was collected under. Unknown labels map to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CommentCategory {
    Location,
    Safety,
    Noise,
    Landlord,
    Transit,
    Condition,
    Price,
    Overall,
    Social,
    #[default]
    General,
}

impl CommentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentCategory::Location => "location",
            CommentCategory::Safety => "safety",
            CommentCategory::Noise => "noise",
            CommentCategory::Landlord => "landlord",
            CommentCategory::Transit => "transit",
            CommentCategory::Condition => "condition",
            CommentCategory::Price => "price",
            CommentCategory::Overall => "overall",
            CommentCategory::Social => "social",
            CommentCategory::General => "general",
        }
    }
}

impl From<String> for CommentCategory {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "location" => CommentCategory::Location,
            "safety" => CommentCategory::Safety,
            "noise" => CommentCategory::Noise,
            "landlord" => CommentCategory::Landlord,
            "transit" => CommentCategory::Transit,
            "condition" => CommentCategory::Condition,
            "price" => CommentCategory::Price,
            "overall" => CommentCategory::Overall,
            "social" => CommentCategory::Social,
            _ => CommentCategory::General,
        }
    }
}

impl fmt::Display for CommentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posting month assumed when a comment carries none.
pub const DEFAULT_TIME_POSTED: &str = "2024-06";

fn default_user_type() -> String {
    "student".to_string()
}

/// Unclassified comment as delivered by the data-provisioning side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawComment {
    pub text: String,
    /// Upvote-like signal.
    #[serde(default, alias = "score")]
    pub numeric_score: i64,
    #[serde(default)]
    pub time_posted: Option<String>,
    #[serde(default)]
    pub category: CommentCategory,
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

/// Classified comment. Sentiment and weight are computed once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
    pub numeric_score: i64,
    pub time_posted: String,
    pub category: CommentCategory,
    pub user_type: String,
    pub sentiment: Sentiment,
    pub recency_weight: f64,
}

/// Per-label counts; their sum equals the number of comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub(crate) fn bump(&mut self, s: Sentiment) {
        match s {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }
}

/// Review-level view over a set of classified comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewAggregate {
    pub comments: Vec<Comment>,
    pub total_mentions: usize,
    pub sentiment_counts: SentimentCounts,
    /// One of 2.0, 2.5, 3.0, 3.5, 4.5.
    pub overall_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_comment_defaults() {
        let c: RawComment = serde_json::from_str(r#"{"text":"quiet street","score":12}"#).unwrap();
        assert_eq!(c.numeric_score, 12);
        assert_eq!(c.category, CommentCategory::General);
        assert_eq!(c.user_type, "student");
        assert!(c.time_posted.is_none());
    }

    #[test]
    fn unknown_category_is_general() {
        let c: RawComment =
            serde_json::from_str(r#"{"text":"x","category":"Laundry"}"#).unwrap();
        assert_eq!(c.category, CommentCategory::General);
        let c: RawComment = serde_json::from_str(r#"{"text":"x","category":"Noise"}"#).unwrap();
        assert_eq!(c.category, CommentCategory::Noise);
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"negative\""
        );
    }
}
