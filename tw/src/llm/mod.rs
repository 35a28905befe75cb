//! LLM transport for Tripwise
//!
//! One request in, one text reply out. Everything above this layer (JSON
//! cleanup, shape validation) lives in [`crate::model`].

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{
    BlockThreshold, DEFAULT_SAFETY_SETTINGS, GenerateRequest, GenerateResponse, HarmCategory, SafetySetting, TokenUsage,
};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Resolves the API key as part of construction, so a missing key surfaces
/// here as [`LlmError::Configuration`].
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Configuration(format!(
                "Unknown LLM provider: '{}'. Supported: gemini",
                other
            )))
        }
    }
}
