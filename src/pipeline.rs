//! One analysis run: comments → sentiment aggregate, issues → grounded
//! questions, all signals → overall assessment.

use landlord_questions::{
    ConcernSource, Flag, Question, QuestionModel, QuestionSource, QuestionSynthesizer, tag,
};
use serde::Serialize;
use student_sentiment::{
    Comment, HybridSentimentClassifier, Insight, ReviewAggregate, SentimentModel, aggregate,
    classify_comments, key_concerns, positive_highlights,
};
use tracing::info;

use crate::assessment::{Assessment, AssessmentInput, assess};
use crate::config::PipelineConfig;
use crate::request::AnalysisRequest;

/// Student side of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReviews {
    #[serde(flatten)]
    pub aggregate: ReviewAggregate,
    pub key_concerns: Vec<Insight>,
    pub positive_highlights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub student_reviews: StudentReviews,
    pub flags: Vec<Flag>,
    pub questions: Vec<Question>,
    pub question_source: QuestionSource,
    pub overall_assessment: Assessment,
}

/// Runs the full analysis.
///
/// With `model = None` no external call is made: sentiment is rules-only and
/// questions come from the fallback enumeration. Never fails.
pub async fn analyze<M>(
    request: AnalysisRequest,
    model: Option<&M>,
    config: &PipelineConfig,
) -> AnalysisReport
where
    M: SentimentModel + QuestionModel + Sync,
{
    let AnalysisRequest {
        listing_text,
        overall_risk,
        quality_score,
        comments,
        red_flags,
        missing_info,
        photo_issues,
    } = request;

    let classifier = match model {
        Some(m) => HybridSentimentClassifier::new(m, config.hybrid),
        None => HybridSentimentClassifier::without_model(),
    };
    let classified = classify_comments(&classifier, &config.recency, comments).await;
    let concerns = key_concerns(&classified);
    let highlights = positive_highlights(&classified);
    let concern_sources: Vec<ConcernSource> = classified.iter().map(concern_source).collect();
    let aggregate = aggregate(classified);

    let tagged = tag(&red_flags, &missing_info, &photo_issues, &concern_sources);
    let synthesizer = match model {
        Some(m) => QuestionSynthesizer::new(m).with_audit(config.audit.clone()),
        None => QuestionSynthesizer::without_model(),
    };
    let outcome = synthesizer
        .synthesize(&tagged, listing_text.as_deref())
        .await;

    let overall_assessment = assess(AssessmentInput {
        text_risk: overall_risk.as_deref(),
        quality_score,
        sentiment_counts: aggregate.sentiment_counts,
        student_score: aggregate.overall_score,
        red_flag_count: red_flags.len(),
        photo_issue_count: photo_issues.len(),
    });

    info!(
        comments = aggregate.total_mentions,
        student_score = aggregate.overall_score,
        flags = tagged.len(),
        questions = outcome.questions.len(),
        fallback = outcome.is_fallback(),
        risk = ?overall_assessment.risk_level,
        "analysis complete"
    );

    AnalysisReport {
        student_reviews: StudentReviews {
            aggregate,
            key_concerns: concerns,
            positive_highlights: highlights,
        },
        flags: tagged.flags,
        questions: outcome.questions,
        question_source: outcome.source,
        overall_assessment,
    }
}

fn concern_source(c: &Comment) -> ConcernSource {
    ConcernSource {
        text: c.text.clone(),
        sentiment: c.sentiment.as_str().to_string(),
        category: c.category.as_str().to_string(),
    }
}
