//! Pipeline settings read from the environment.

use ai_llm_service::AiLlmError;
use ai_llm_service::error_handler::{ConfigError, env_opt};
use landlord_questions::AuditTrail;
use student_sentiment::{HybridPolicy, RecencyWeighter};

pub const RECENCY_REFERENCE_MONTH: &str = "RECENCY_REFERENCE_MONTH";

/// Knobs of one analysis run that do not depend on the model transport.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub hybrid: HybridPolicy,
    pub recency: RecencyWeighter,
    pub audit: AuditTrail,
}

impl PipelineConfig {
    /// Reads `SENTIMENT_HYBRID_ENABLED`, `RECENCY_REFERENCE_MONTH` and
    /// `QUESTION_AUDIT_DIR`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidFormat`] when the reference month is not `YYYY-MM`.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let recency = match env_opt(RECENCY_REFERENCE_MONTH) {
            Some(month) => RecencyWeighter::with_reference_month(&month).ok_or(
                ConfigError::InvalidFormat {
                    var: RECENCY_REFERENCE_MONTH,
                    reason: "expected YYYY-MM",
                },
            )?,
            None => RecencyWeighter::default(),
        };

        Ok(Self {
            hybrid: HybridPolicy::from_env(),
            recency,
            audit: AuditTrail::from_env(),
        })
    }

    /// Disables Tier 2 escalation.
    pub fn rules_only(mut self) -> Self {
        self.hybrid = HybridPolicy { escalate: false };
        self
    }
}
