//! Tiered hybrid sentiment classification.
//!
//! 1) **Tier 1**: strong lexical evidence (`|score| >= 3`) decides alone.
//! 2) **Tier 2**: weak evidence (`confidence < 2`) is escalated to the
//!    sentiment model. A usable label wins; anything else falls through.
//! 3) **Tier 3**: moderate lexical rule (`|score| >= 1`), else neutral.
//!
//! The model is advisory: errors and odd answers are logged and the rules
//! decide.

use std::future::Future;

use ai_llm_service::{AiLlmError, LlmServiceProfiles, error_handler::env_flag};
use tracing::{debug, warn};

use crate::lexicon::{LexicalScore, LexicalScorer};
use crate::model::Sentiment;

const STRONG_THRESHOLD: f64 = 3.0;
const MODERATE_THRESHOLD: f64 = 1.0;
const ESCALATION_CONFIDENCE: f64 = 2.0;

/// External text classifier consulted for borderline comments.
pub trait SentimentModel {
    /// Sends `prompt` and returns the raw model answer.
    fn classify_sentiment(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AiLlmError>> + Send;
}

impl SentimentModel for LlmServiceProfiles {
    fn classify_sentiment(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AiLlmError>> + Send {
        self.generate_sentiment(prompt)
    }
}

/// Escalation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridPolicy {
    /// When `false`, Tier 2 is skipped and no model call is ever made.
    pub escalate: bool,
}

impl Default for HybridPolicy {
    fn default() -> Self {
        Self { escalate: true }
    }
}

impl HybridPolicy {
    /// Reads `SENTIMENT_HYBRID_ENABLED` (default `true`).
    pub fn from_env() -> Self {
        Self {
            escalate: env_flag("SENTIMENT_HYBRID_ENABLED", true),
        }
    }
}

/// Which tier produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    StrongRule,
    Model,
    ModerateRule,
}

/// Label plus the evidence behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationOutcome {
    pub sentiment: Sentiment,
    pub tier: Tier,
    pub score: LexicalScore,
}

/// Rules first, model only for the ambiguous middle band.
///
/// Borrows the model handle; the caller owns and reuses it across requests.
#[derive(Debug)]
pub struct HybridSentimentClassifier<'a, M> {
    scorer: LexicalScorer,
    model: Option<&'a M>,
    policy: HybridPolicy,
}

impl<'a, M: SentimentModel + Sync> HybridSentimentClassifier<'a, M> {
    pub fn new(model: &'a M, policy: HybridPolicy) -> Self {
        Self {
            scorer: LexicalScorer::new(),
            model: Some(model),
            policy,
        }
    }

    /// Rules-only classifier; Tier 2 never runs.
    pub fn without_model() -> Self {
        Self {
            scorer: LexicalScorer::new(),
            model: None,
            policy: HybridPolicy { escalate: false },
        }
    }

    pub async fn classify(&self, text: &str) -> Sentiment {
        self.classify_detailed(text).await.sentiment
    }

    pub async fn classify_detailed(&self, text: &str) -> ClassificationOutcome {
        let score = self.scorer.score(text);
        let decided = |sentiment, tier| ClassificationOutcome {
            sentiment,
            tier,
            score,
        };

        if score.signed_score >= STRONG_THRESHOLD {
            return decided(Sentiment::Positive, Tier::StrongRule);
        }
        if score.signed_score <= -STRONG_THRESHOLD {
            return decided(Sentiment::Negative, Tier::StrongRule);
        }

        if score.confidence < ESCALATION_CONFIDENCE && self.policy.escalate {
            if let Some(model) = self.model {
                if let Some(sentiment) = ask_model(model, text).await {
                    return decided(sentiment, Tier::Model);
                }
            }
        }

        let sentiment = if score.signed_score >= MODERATE_THRESHOLD {
            Sentiment::Positive
        } else if score.signed_score <= -MODERATE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        decided(sentiment, Tier::ModerateRule)
    }
}

async fn ask_model<M: SentimentModel>(model: &M, text: &str) -> Option<Sentiment> {
    let prompt = build_sentiment_prompt(text);
    match model.classify_sentiment(&prompt).await {
        Ok(raw) => {
            let label = parse_sentiment_label(&raw);
            match label {
                Some(s) => debug!(sentiment = %s, "tier2: model label accepted"),
                None => warn!(
                    response = %raw.chars().take(50).collect::<String>(),
                    "tier2: unexpected model response, falling back to rules"
                ),
            }
            label
        }
        Err(e) => {
            warn!(error = %e, "tier2: sentiment model call failed, falling back to rules");
            None
        }
    }
}

/// Sentiment-only prompt restricted to three labels.
pub fn build_sentiment_prompt(text: &str) -> String {
    format!(
        "You are analyzing Reddit comments written by college students about apartments.\n\
\n\
Classify the sentiment as EXACTLY one of:\n\
positive\n\
neutral\n\
negative\n\
\n\
Rules:\n\
- Complaints about noise, walls, neighbors, studying conditions, safety, landlords, or maintenance are NEGATIVE.\n\
- Phrases like \"would not recommend\", numeric ratings below 5/10, or warnings to others are NEGATIVE.\n\
- Mixed or descriptive comments without clear satisfaction or dissatisfaction are NEUTRAL.\n\
- Praise or recommendations are POSITIVE.\n\
- Do NOT default to neutral if the comment clearly harms quality of life.\n\
\n\
Return only ONE word.\n\
\n\
Comment:\n\
{text}\n"
    )
}

/// Extracts a label from a model answer.
///
/// The first word must be one of the three labels; otherwise a `positive`
/// or `negative` substring (checked in that order) is accepted.
pub fn parse_sentiment_label(raw: &str) -> Option<Sentiment> {
    let lower = raw.trim().to_lowercase();
    match lower.split_whitespace().next() {
        Some("positive") => return Some(Sentiment::Positive),
        Some("neutral") => return Some(Sentiment::Neutral),
        Some("negative") => return Some(Sentiment::Negative),
        _ => {}
    }
    if lower.contains("positive") {
        Some(Sentiment::Positive)
    } else if lower.contains("negative") {
        Some(Sentiment::Negative)
    } else {
        None
    }
}
