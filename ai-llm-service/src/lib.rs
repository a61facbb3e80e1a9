//! Shared model transport for the listing-insight workspace.
//!
//! Two logical profiles are exposed through [`service_profiles::LlmServiceProfiles`]:
//! a lightweight **sentiment** profile used for borderline comment
//! classification and a **questions** profile used for landlord question
//! generation. Providers are Ollama and any OpenAI-compatible endpoint.
//!
//! Construct the service once, wrap it in `Arc`, and lend it to the pipelines
//! that need it.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
