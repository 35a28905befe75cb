//! Model Client error types

use thiserror::Error;

use crate::llm::LlmError;

/// Why a model call produced no usable data
///
/// None of these are retried; the wizard offers the user a manual retry.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport failure, rejected credentials, or a fully blocked reply
    #[error("Model unavailable: {reason}")]
    NoResponse { reason: String },

    /// The reply did not parse, or parsed into the wrong shape
    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, cleaned: String },

    /// No API key or an unknown provider
    #[error("Model not configured: {0}")]
    Configuration(String),

    #[error("Prompt is empty")]
    EmptyPrompt,
}

impl ModelError {
    /// Cleaned reply text kept for diagnostics
    pub fn cleaned_text(&self) -> Option<&str> {
        match self {
            ModelError::MalformedResponse { cleaned, .. } => Some(cleaned),
            _ => None,
        }
    }
}

impl From<LlmError> for ModelError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(message) => ModelError::Configuration(message),
            other => ModelError::NoResponse {
                reason: other.to_string(),
            },
        }
    }
}
