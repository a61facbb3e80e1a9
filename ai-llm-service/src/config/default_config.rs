//! Default model profiles loaded strictly from environment variables.
//!
//! Two roles are supported:
//!
//! - **Sentiment** → small, deterministic model answering with one word
//! - **Questions** → generation model producing the landlord question JSON
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = `ollama` (default) or `openai`
//! - `LLM_MAX_TOKENS` = optional generation cap for the questions profile (u32)
//! - `LLM_TIMEOUT_SECS` = optional per-request timeout (u64)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//!
//! OpenAI-compatible:
//! - `OPENAI_URL` = endpoint (default `https://api.openai.com`)
//! - `OPENAI_API_KEY` = bearer key (mandatory)
//!
//! Models:
//! - `SENTIMENT_MODEL` (mandatory)
//! - `QUESTION_MODEL` (optional; absent means the sentiment model name is reused
//!   with the question sampling defaults)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u32, env_opt_u64, must_env,
        validate_http_endpoint,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Resolves the provider from `LLM_KIND` (default: Ollama).
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    match env_opt("LLM_KIND") {
        Some(kind) => Ok(kind.parse::<LlmProvider>()?),
        None => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

/// Endpoint and key for the selected provider.
fn endpoint_and_key(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
        LlmProvider::OpenAI => {
            let url = env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            validate_http_endpoint("OPENAI_URL", &url)?;
            let key = must_env("OPENAI_API_KEY")?;
            Ok((url, Some(key)))
        }
    }
}

/// Profile for the Tier-2 sentiment call.
///
/// # Env
/// - `SENTIMENT_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.0)` (single-word, deterministic answer)
/// - `max_tokens = Some(8)`
/// - `timeout_secs = Some(20)`
pub fn config_sentiment() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let model = must_env("SENTIMENT_MODEL")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(20));

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(8),
        temperature: Some(0.0),
        top_p: None,
        timeout_secs,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Profile for landlord question generation.
///
/// # Env
/// - `QUESTION_MODEL`, falling back to `SENTIMENT_MODEL` when unset
/// - `LLM_MAX_TOKENS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.4)`
/// - `top_p = Some(0.9)`
/// - `timeout_secs = Some(60)`
pub fn config_questions() -> Result<LlmModelConfig, AiLlmError> {
    let model = match env_opt("QUESTION_MODEL") {
        Some(m) => m,
        None => must_env("SENTIMENT_MODEL")?,
    };
    let provider = provider_from_env()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(60));

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.4),
        top_p: Some(0.9),
        timeout_secs,
    };
    cfg.validate()?;
    Ok(cfg)
}
