//! Question synthesis state machine.
//!
//! 1) empty flag set → no questions, no call
//! 2) prompt → generator → [`parse_candidates`]
//! 3) [`validate`] against the tagged ids
//! 4) [`fallback_decision`]; on any rule, or on a transport failure,
//!    the single composite question from [`compose_fallback`]

use std::future::Future;

use ai_llm_service::{AiLlmError, LlmServiceProfiles};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::QuestionError;
use crate::fallback::compose_fallback;
use crate::flags::TaggedFlags;
use crate::parse::{CandidateSet, cleanup_json_like, parse_candidates};
use crate::prompt::build_question_prompt;
use crate::telemetry::audit_dump::{AuditRun, AuditTrail};
use crate::validate::{FallbackReason, Question, ValidationReport, fallback_decision, validate};

/// External generator of landlord questions.
pub trait QuestionModel {
    /// Sends `prompt` and returns the raw generator answer.
    fn generate_questions(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AiLlmError>> + Send;
}

impl QuestionModel for LlmServiceProfiles {
    fn generate_questions(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AiLlmError>> + Send {
        LlmServiceProfiles::generate_questions(self, prompt)
    }
}

/// Which path produced the returned questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum QuestionSource {
    /// Flag set was empty; nothing was asked.
    NoFlags,
    /// Validated generator output.
    Generated,
    /// Composite enumeration of every flag.
    Fallback { reason: FallbackReason },
}

/// Questions plus the audit data behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisOutcome {
    pub questions: Vec<Question>,
    pub source: QuestionSource,
    pub report: ValidationReport,
}

impl SynthesisOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, QuestionSource::Fallback { .. })
    }
}

/// Grounded question synthesizer. Never fails: every error path ends in the
/// fallback question.
#[derive(Debug)]
pub struct QuestionSynthesizer<'a, M> {
    model: Option<&'a M>,
    audit: AuditTrail,
}

impl<'a, M: QuestionModel + Sync> QuestionSynthesizer<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model: Some(model),
            audit: AuditTrail::disabled(),
        }
    }

    /// Synthesizer that always uses the fallback question.
    pub fn without_model() -> Self {
        Self {
            model: None,
            audit: AuditTrail::disabled(),
        }
    }

    pub fn with_audit(mut self, audit: AuditTrail) -> Self {
        self.audit = audit;
        self
    }

    pub async fn synthesize(
        &self,
        tagged: &TaggedFlags,
        listing_text: Option<&str>,
    ) -> SynthesisOutcome {
        let total_flags = tagged.len();
        if total_flags == 0 {
            info!("no flags found, no questions needed");
            return SynthesisOutcome {
                questions: Vec::new(),
                source: QuestionSource::NoFlags,
                report: ValidationReport::default(),
            };
        }

        let audit = self.audit.start_run();
        let Some(model) = self.model else {
            debug!(total_flags, "no generation model, using fallback");
            return fallback(
                &audit,
                tagged,
                ValidationReport::default(),
                FallbackReason::ModelUnavailable,
            );
        };

        let prompt = build_question_prompt(tagged, listing_text);
        audit.dump("prompt.txt", prompt.as_bytes());
        debug!(total_flags, prompt_len = prompt.len(), "requesting questions");

        let candidates = match generate(&audit, model, &prompt).await {
            Ok(set) => set,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "question generation failed, using fallback");
                let reason = FallbackReason::GenerationFailed {
                    error: e.to_string(),
                };
                return fallback(&audit, tagged, ValidationReport::default(), reason);
            }
        };

        let report = validate(candidates.questions, tagged);
        debug!(
            accepted = report.accepted.len(),
            rejected = report.hallucinations(),
            invalid_ids = ?report.invalid_ids(),
            "candidates validated"
        );

        match fallback_decision(&report, total_flags) {
            Some(reason) => {
                warn!(%reason, "generated questions failed validation, using fallback");
                fallback(&audit, tagged, report, reason)
            }
            None => {
                info!(
                    questions = report.accepted.len(),
                    total_flags, "generated questions accepted"
                );
                dump_report(&audit, &report, None);
                SynthesisOutcome {
                    questions: report.accepted.clone(),
                    source: QuestionSource::Generated,
                    report,
                }
            }
        }
    }
}

async fn generate<M: QuestionModel>(
    audit: &AuditRun,
    model: &M,
    prompt: &str,
) -> Result<CandidateSet, QuestionError> {
    let raw = model.generate_questions(prompt).await?;
    audit.dump("raw.txt", raw.as_bytes());
    if audit.is_enabled() {
        audit.dump("clean.json", cleanup_json_like(&raw).as_bytes());
    }
    parse_candidates(&raw)
}

fn fallback(
    audit: &AuditRun,
    tagged: &TaggedFlags,
    report: ValidationReport,
    reason: FallbackReason,
) -> SynthesisOutcome {
    dump_report(audit, &report, Some(&reason));
    SynthesisOutcome {
        questions: compose_fallback(tagged).into_iter().collect(),
        source: QuestionSource::Fallback { reason },
        report,
    }
}

fn dump_report(audit: &AuditRun, report: &ValidationReport, reason: Option<&FallbackReason>) {
    if !audit.is_enabled() {
        return;
    }
    let body = serde_json::json!({ "report": report, "fallback": reason });
    if let Ok(bytes) = serde_json::to_vec_pretty(&body) {
        audit.dump("report.json", &bytes);
    }
}
