//! Overall listing risk from text, photo and student signals.

use serde::Serialize;
use student_sentiment::SentimentCounts;

const LOW_RECOMMENDATION: &str =
    "This listing looks relatively safe. Still ask the suggested questions!";
const MEDIUM_RECOMMENDATION: &str =
    "Proceed with caution. Make sure to ask all the suggested questions and schedule a tour.";
const HIGH_RECOMMENDATION: &str =
    "Major red flags detected. Consider other options or investigate thoroughly before proceeding.";
const NO_CONCERNS_SUMMARY: &str =
    "This listing looks relatively solid. No major red flags detected.";

/// Photo quality assumed when the image analyzer reported none.
pub const DEFAULT_QUALITY_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub red_flag_count: usize,
    pub photo_issue_count: usize,
    pub student_score: f64,
    pub summary: String,
}

/// Signals feeding [`assess`].
#[derive(Debug, Clone, Copy)]
pub struct AssessmentInput<'a> {
    pub text_risk: Option<&'a str>,
    pub quality_score: Option<f64>,
    pub sentiment_counts: SentimentCounts,
    pub student_score: f64,
    pub red_flag_count: usize,
    pub photo_issue_count: usize,
}

/// Averages three 1-3 sub-risks: `<= 1.5` low, `<= 2.5` medium, else high.
pub fn assess(input: AssessmentInput<'_>) -> Assessment {
    let text = text_risk(input.text_risk);
    let image = image_risk(input.quality_score.unwrap_or(DEFAULT_QUALITY_SCORE));
    let student = student_risk(&input.sentiment_counts);

    let avg = f64::from(text + image + student) / 3.0;
    let (risk_level, recommendation) = if avg <= 1.5 {
        (RiskLevel::Low, LOW_RECOMMENDATION)
    } else if avg <= 2.5 {
        (RiskLevel::Medium, MEDIUM_RECOMMENDATION)
    } else {
        (RiskLevel::High, HIGH_RECOMMENDATION)
    };

    Assessment {
        risk_level,
        recommendation: recommendation.to_string(),
        red_flag_count: input.red_flag_count,
        photo_issue_count: input.photo_issue_count,
        student_score: input.student_score,
        summary: summary(text, image, student, input.red_flag_count),
    }
}

/// Exact lowercase labels only; anything else is medium.
fn text_risk(level: Option<&str>) -> u8 {
    match level {
        Some("low") => 1,
        Some("high") => 3,
        _ => 2,
    }
}

fn image_risk(quality_score: f64) -> u8 {
    if quality_score >= 7.0 {
        1
    } else if quality_score >= 4.0 {
        2
    } else {
        3
    }
}

/// Negative share of comments; no comments counts as a 0.5 share.
fn student_risk(counts: &SentimentCounts) -> u8 {
    let total = counts.total();
    let negative_ratio = if total == 0 {
        0.5
    } else {
        counts.negative as f64 / total as f64
    };
    if negative_ratio < 0.3 {
        1
    } else if negative_ratio < 0.6 {
        2
    } else {
        3
    }
}

fn summary(text: u8, image: u8, student: u8, red_flag_count: usize) -> String {
    let mut concerns: Vec<&str> = Vec::new();
    match text {
        3 => concerns.push("listing description has serious issues"),
        2 => concerns.push("listing description raises some concerns"),
        _ => {}
    }
    match image {
        3 => concerns.push("photos are misleading or poor quality"),
        2 => concerns.push("photo quality could be better"),
        _ => {}
    }
    match student {
        3 => concerns.push("student reviews are largely negative"),
        2 => concerns.push("student reviews are mixed"),
        _ => {}
    }

    if concerns.is_empty() {
        return NO_CONCERNS_SUMMARY.to_string();
    }
    format!(
        "Found {red_flag_count} red flag(s). {}.",
        capitalize(&concerns.join(", "))
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counts(positive: usize, neutral: usize, negative: usize) -> SentimentCounts {
        SentimentCounts {
            positive,
            neutral,
            negative,
        }
    }

    fn input(text: Option<&str>, quality: Option<f64>, c: SentimentCounts) -> AssessmentInput<'_> {
        AssessmentInput {
            text_risk: text,
            quality_score: quality,
            sentiment_counts: c,
            student_score: 3.0,
            red_flag_count: 2,
            photo_issue_count: 1,
        }
    }

    #[test]
    fn clean_listing_is_low_risk() {
        let a = assess(input(Some("low"), Some(8.0), counts(5, 1, 0)));
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert_eq!(a.summary, NO_CONCERNS_SUMMARY);
        assert_eq!(a.recommendation, LOW_RECOMMENDATION);
    }

    #[test]
    fn defaults_are_medium() {
        // text 2, image 2 (quality 5), student 2 (no comments)
        let a = assess(input(None, None, SentimentCounts::default()));
        assert_eq!(a.risk_level, RiskLevel::Medium);
        assert_eq!(
            a.summary,
            "Found 2 red flag(s). Listing description raises some concerns, \
             photo quality could be better, student reviews are mixed."
        );
    }

    #[test]
    fn bad_everything_is_high() {
        let a = assess(input(Some("high"), Some(2.0), counts(1, 0, 3)));
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.recommendation, HIGH_RECOMMENDATION);
        assert!(a.summary.starts_with("Found 2 red flag(s). Listing description has serious issues"));
    }

    #[test]
    fn risk_labels_match_exactly() {
        assert_eq!(text_risk(Some("high")), 3);
        assert_eq!(text_risk(Some("low")), 1);
        assert_eq!(text_risk(Some("HIGH")), 2);
        assert_eq!(text_risk(Some(" low")), 2);
        assert_eq!(text_risk(None), 2);
    }

    #[test]
    fn ratio_boundaries() {
        assert_eq!(student_risk(&counts(7, 0, 3)), 2); // 0.3
        assert_eq!(student_risk(&counts(8, 0, 2)), 1);
        assert_eq!(student_risk(&counts(4, 0, 6)), 3); // 0.6
        assert_eq!(image_risk(7.0), 1);
        assert_eq!(image_risk(4.0), 2);
        assert_eq!(image_risk(3.9), 3);
    }
}
