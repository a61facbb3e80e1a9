//! Errors raised inside the question pipeline.
//!
//! None of these reach the caller of [`crate::QuestionSynthesizer`]: every
//! variant is a transport-class failure that routes the request to the
//! fallback question.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionError {
    /// Generation call failed (network, timeout, provider status).
    #[error("generation call failed: {0}")]
    Transport(#[from] AiLlmError),

    /// Generator answered, but not with the `{"questions": [...]}` shape.
    #[error("malformed generator payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl QuestionError {
    /// Short label used in fallback reasons and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QuestionError::Transport(_) => "transport",
            QuestionError::MalformedPayload(_) => "malformed_payload",
        }
    }
}
