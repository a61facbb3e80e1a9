//! Short student-facing excerpts pulled from classified comments.

use serde::Serialize;

use crate::model::{Comment, CommentCategory, Sentiment};

const MAX_INSIGHTS: usize = 5;
const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub text: String,
    pub category: CommentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Negative and neutral comments, at most five, in input order.
pub fn key_concerns(comments: &[Comment]) -> Vec<Insight> {
    comments
        .iter()
        .filter(|c| matches!(c.sentiment, Sentiment::Negative | Sentiment::Neutral))
        .take(MAX_INSIGHTS)
        .map(|c| Insight {
            text: excerpt(&c.text),
            category: c.category,
            sentiment: Some(c.sentiment),
        })
        .collect()
}

/// Positive comments, at most five, in input order.
pub fn positive_highlights(comments: &[Comment]) -> Vec<Insight> {
    comments
        .iter()
        .filter(|c| c.sentiment == Sentiment::Positive)
        .take(MAX_INSIGHTS)
        .map(|c| Insight {
            text: excerpt(&c.text),
            category: c.category,
            sentiment: None,
        })
        .collect()
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str, sentiment: Sentiment) -> Comment {
        Comment {
            text: text.into(),
            numeric_score: 0,
            time_posted: "2024-12".into(),
            category: CommentCategory::Noise,
            user_type: "student".into(),
            sentiment,
            recency_weight: 1.5,
        }
    }

    #[test]
    fn concerns_include_neutral_and_cap_at_five() {
        let mut comments: Vec<Comment> =
            (0..6).map(|i| c(&format!("bad {i}"), Sentiment::Negative)).collect();
        comments.insert(0, c("ok", Sentiment::Neutral));
        comments.push(c("great", Sentiment::Positive));

        let out = key_concerns(&comments);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].text, "ok");
        assert_eq!(out[0].sentiment, Some(Sentiment::Neutral));
        assert_eq!(out[4].text, "bad 3");
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "x".repeat(200);
        let out = positive_highlights(&[c(&long, Sentiment::Positive)]);
        assert_eq!(out[0].text.len(), 153);
        assert!(out[0].text.ends_with("..."));
        assert!(out[0].sentiment.is_none());
    }

    #[test]
    fn exactly_150_chars_kept_whole() {
        let text = "y".repeat(150);
        let out = key_concerns(&[c(&text, Sentiment::Negative)]);
        assert_eq!(out[0].text, text);
    }
}
