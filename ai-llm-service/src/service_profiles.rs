//! Shared model service with two profiles: `sentiment` and `questions`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and lend it to the pipelines.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+timeout).
//! - If the `questions` profile is not provided, it falls back to `sentiment`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//! let label = svc.generate_sentiment("Classify: 'it is fine I guess'").await?;
//! println!("SENTIMENT: {label}");
//! # Ok(()) }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{
        default_config::{config_questions, config_sentiment},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// System instruction sent with every sentiment request.
const SENTIMENT_SYSTEM: &str = "Answer with exactly one lowercase word.";
/// System instruction sent with every question-generation request.
const QUESTIONS_SYSTEM: &str = "Respond with valid JSON only.";

/// Shared service managing the **sentiment** and **questions** profiles.
pub struct LlmServiceProfiles {
    sentiment: LlmModelConfig,
    questions: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service.
    ///
    /// - `sentiment`: profile used for borderline comment classification.
    /// - `questions_opt`: profile used for question generation; `None` reuses `sentiment`.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] if either profile fails validation.
    pub fn new(
        sentiment: LlmModelConfig,
        questions_opt: Option<LlmModelConfig>,
    ) -> Result<Self, AiLlmError> {
        let questions = questions_opt.unwrap_or_else(|| sentiment.clone());
        sentiment.validate()?;
        questions.validate()?;

        Ok(Self {
            sentiment,
            questions,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        })
    }

    /// Builds both profiles from environment variables.
    ///
    /// See [`crate::config::default_config`] for the variables read.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_sentiment()?, Some(config_questions()?))
    }

    /// Sends a classification prompt through the **sentiment** profile.
    pub async fn generate_sentiment(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generate_with(&self.sentiment, prompt, Some(SENTIMENT_SYSTEM))
            .await
    }

    /// Sends a generation prompt through the **questions** profile.
    pub async fn generate_questions(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generate_with(&self.questions, prompt, Some(QUESTIONS_SYSTEM))
            .await
    }

    /// Returns references to the current profiles `(sentiment, questions)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.sentiment, &self.questions)
    }

    /* --------------------- Internals --------------------- */

    async fn generate_with(
        &self,
        cfg: &LlmModelConfig,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        debug!(provider = ?cfg.provider, model = %cfg.model, "dispatching generation");
        match cfg.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(cfg).await?;
                cli.generate(prompt, system).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(cfg).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key identifying one HTTP client configuration.
///
/// Sampling knobs travel in each request body and are not part of the key.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:1.7b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(8),
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(20),
        }
    }

    #[test]
    fn questions_profile_falls_back_to_sentiment() {
        let svc = LlmServiceProfiles::new(sentiment_cfg(), None).unwrap();
        let (s, q) = svc.profiles();
        assert_eq!(s, q);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let mut bad = sentiment_cfg();
        bad.endpoint = "localhost".into();
        assert!(LlmServiceProfiles::new(sentiment_cfg(), Some(bad)).is_err());
    }

    #[tokio::test]
    async fn clients_are_cached_per_config() {
        let svc = LlmServiceProfiles::new(sentiment_cfg(), None).unwrap();
        let a = svc.get_or_init_ollama(&sentiment_cfg()).await.unwrap();
        let b = svc.get_or_init_ollama(&sentiment_cfg()).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let mut other = sentiment_cfg();
        other.model = "qwen3:8b".into();
        let c = svc.get_or_init_ollama(&other).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
