//! Deterministic lexical scoring over a fixed student-housing vocabulary.
//!
//! Matching is plain substring containment on the lower-cased text: no
//! tokenization, so `"mold"` also hits the moderate term `"old"` and a long
//! phrase and a shorter phrase inside it both count.

/// Housing-specific complaints (weight 3).
pub const COLLEGE_NEGATIVE: &[&str] = &[
    "sketchy",
    "loud parties",
    "thin walls",
    "far from campus",
    "overpriced",
    "landlord sucks",
    "avoid",
    "scam",
    "dirty",
    "roaches",
    "mold",
    "broken ac",
    "parking nightmare",
];

/// Housing-specific praise (weight 3).
pub const COLLEGE_POSITIVE: &[&str] = &[
    "close to campus",
    "quiet",
    "great location",
    "worth it",
    "responsive landlord",
    "clean",
    "spacious",
    "good deal",
    "highly recommend",
    "love living here",
    "clutch",
];

/// Weight 2.
pub const STRONG_NEGATIVE: &[&str] = &[
    "worst",
    "terrible",
    "awful",
    "disgusting",
    "avoid",
    "nightmare",
    "scam",
    "shady",
    "broken",
    "horrible",
    "trash",
    "sucks",
    "hate",
    "miserable",
    "brutal",
    "never again",
    "rip off",
];

/// Weight 2.
pub const STRONG_POSITIVE: &[&str] = &[
    "best",
    "amazing",
    "perfect",
    "excellent",
    "love",
    "great",
    "wonderful",
    "fantastic",
    "highly recommend",
    "awesome",
    "clutch",
    "gem",
    "steal",
    "couldn't be happier",
];

/// Weight 1.
pub const MODERATE_NEGATIVE: &[&str] = &[
    "bad",
    "issue",
    "problem",
    "annoying",
    "inconvenient",
    "sketchy",
    "loud",
    "noisy",
    "far",
    "expensive",
    "old",
    "small",
    "complaint",
    "disappointing",
    "meh",
    "mediocre",
];

/// Weight 1.
pub const MODERATE_POSITIVE: &[&str] = &[
    "good",
    "nice",
    "clean",
    "safe",
    "convenient",
    "happy",
    "worth",
    "solid",
    "recommend",
    "impressed",
    "comfortable",
    "spacious",
    "decent",
    "satisfied",
];

/// Dampen the score rather than flip it.
pub const NEGATIONS: &[&str] = &["not", "no", "never", "don't", "didn't", "won't", "barely"];

const COLLEGE_WEIGHT: f64 = 3.0;
const STRONG_WEIGHT: f64 = 2.0;
const MODERATE_WEIGHT: f64 = 1.0;
const NEGATION_SCALE: f64 = 0.7;
const NEGATION_CONFIDENCE_PENALTY: f64 = 0.5;

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalScore {
    /// Weighted positive minus weighted negative, scaled by 0.7 when negated.
    pub signed_score: f64,
    /// Unweighted polar hits, minus 0.5 per negation hit.
    pub confidence: f64,
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub negation_hits: usize,
}

/// Stateless scorer over the fixed vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> LexicalScore {
        let lower = text.to_lowercase();
        let hits = |terms: &[&str]| count_hits(&lower, terms);

        let college_neg = hits(COLLEGE_NEGATIVE);
        let college_pos = hits(COLLEGE_POSITIVE);
        let strong_neg = hits(STRONG_NEGATIVE);
        let strong_pos = hits(STRONG_POSITIVE);
        let moderate_neg = hits(MODERATE_NEGATIVE);
        let moderate_pos = hits(MODERATE_POSITIVE);
        let negation_hits = hits(NEGATIONS);

        let positive = college_pos as f64 * COLLEGE_WEIGHT
            + strong_pos as f64 * STRONG_WEIGHT
            + moderate_pos as f64 * MODERATE_WEIGHT;
        let negative = college_neg as f64 * COLLEGE_WEIGHT
            + strong_neg as f64 * STRONG_WEIGHT
            + moderate_neg as f64 * MODERATE_WEIGHT;

        let positive_hits = college_pos + strong_pos + moderate_pos;
        let negative_hits = college_neg + strong_neg + moderate_neg;

        let mut signed_score = positive - negative;
        let mut confidence = (positive_hits + negative_hits) as f64;
        if negation_hits > 0 {
            signed_score *= NEGATION_SCALE;
            confidence -= negation_hits as f64 * NEGATION_CONFIDENCE_PENALTY;
        }

        LexicalScore {
            signed_score,
            confidence,
            positive_hits,
            negative_hits,
            negation_hits,
        }
    }
}

fn count_hits(lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| lower.contains(**t)).count()
}
