//! Student comment sentiment for housing listings.
//!
//! Flow: [`LexicalScorer`] scores each comment; [`HybridSentimentClassifier`]
//! decides the label, consulting a [`SentimentModel`] only when the lexical
//! evidence is weak; [`RecencyWeighter`] weights it by posting month; and
//! [`aggregate()`] folds everything into a [`ReviewAggregate`].
//!
//! ```
//! use student_sentiment::{
//!     HybridSentimentClassifier, RawComment, RecencyWeighter, aggregate, classify_comments,
//! };
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), serde_json::Error> {
//! let classifier = HybridSentimentClassifier::<LlmServiceProfiles>::without_model();
//! let raw: Vec<RawComment> = serde_json::from_str(
//!     r#"[{"text":"worst landlord ever, mold everywhere, avoid","time_posted":"2024-12"}]"#,
//! )?;
//! let comments = classify_comments(&classifier, &RecencyWeighter::default(), raw).await;
//! assert_eq!(aggregate(comments).overall_score, 2.0);
//! # Ok(()) }
//! ```

pub mod aggregate;
pub mod classifier;
pub mod insights;
pub mod lexicon;
pub mod model;
pub mod recency;

pub use aggregate::{aggregate, classify_comments};
pub use classifier::{
    ClassificationOutcome, HybridPolicy, HybridSentimentClassifier, SentimentModel, Tier,
};
pub use insights::{Insight, key_concerns, positive_highlights};
pub use lexicon::{LexicalScore, LexicalScorer};
pub use model::{
    Comment, CommentCategory, RawComment, ReviewAggregate, Sentiment, SentimentCounts,
};
pub use recency::RecencyWeighter;
