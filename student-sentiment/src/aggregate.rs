//! Review-level scoring: classify raw comments once, then fold them into a
//! recency-weighted aggregate.

use tracing::{debug, info};

use crate::classifier::{HybridSentimentClassifier, SentimentModel, Tier};
use crate::model::{
    Comment, DEFAULT_TIME_POSTED, RawComment, ReviewAggregate, Sentiment, SentimentCounts,
};
use crate::recency::RecencyWeighter;

const NEUTRAL_SCORE: f64 = 3.0;

/// Classifies every comment and attaches its recency weight.
///
/// Comments are processed in input order; a missing posting month is
/// replaced with [`DEFAULT_TIME_POSTED`] before weighting.
pub async fn classify_comments<M: SentimentModel + Sync>(
    classifier: &HybridSentimentClassifier<'_, M>,
    weighter: &RecencyWeighter,
    raw: Vec<RawComment>,
) -> Vec<Comment> {
    let mut out = Vec::with_capacity(raw.len());
    let mut escalated = 0usize;

    for rc in raw {
        let outcome = classifier.classify_detailed(&rc.text).await;
        if outcome.tier == Tier::Model {
            escalated += 1;
        }
        let time_posted = rc
            .time_posted
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_POSTED.to_string());
        let recency_weight = weighter.weight(&time_posted);
        debug!(
            sentiment = %outcome.sentiment,
            tier = ?outcome.tier,
            score = outcome.score.signed_score,
            recency_weight,
            "comment classified"
        );

        out.push(Comment {
            text: rc.text,
            numeric_score: rc.numeric_score,
            time_posted,
            category: rc.category,
            user_type: rc.user_type,
            sentiment: outcome.sentiment,
            recency_weight,
        });
    }

    info!(comments = out.len(), escalated, "comment classification done");
    out
}

/// Folds classified comments into counts and an overall score.
///
/// Weighted ratios, checked in order: negative share `> 0.5` → 2.0,
/// positive share `> 0.5` → 4.5, positive outweighs negative → 3.5,
/// negative outweighs positive → 2.5, otherwise 3.0. No comments → 3.0.
pub fn aggregate(comments: Vec<Comment>) -> ReviewAggregate {
    let mut counts = SentimentCounts::default();
    let (mut pos_w, mut neg_w, mut total_w) = (0.0_f64, 0.0_f64, 0.0_f64);

    for c in &comments {
        counts.bump(c.sentiment);
        total_w += c.recency_weight;
        match c.sentiment {
            Sentiment::Positive => pos_w += c.recency_weight,
            Sentiment::Negative => neg_w += c.recency_weight,
            Sentiment::Neutral => {}
        }
    }

    let overall_score = if total_w > 0.0 {
        overall_from_weights(pos_w, neg_w, total_w)
    } else {
        NEUTRAL_SCORE
    };

    ReviewAggregate {
        total_mentions: comments.len(),
        comments,
        sentiment_counts: counts,
        overall_score,
    }
}

fn overall_from_weights(pos_w: f64, neg_w: f64, total_w: f64) -> f64 {
    let pos_ratio = pos_w / total_w;
    let neg_ratio = neg_w / total_w;
    if neg_ratio > 0.5 {
        2.0
    } else if pos_ratio > 0.5 {
        4.5
    } else if pos_ratio > neg_ratio {
        3.5
    } else if neg_ratio > pos_ratio {
        2.5
    } else {
        NEUTRAL_SCORE
    }
}
