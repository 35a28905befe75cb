//! Wizard error types

use thiserror::Error;

use crate::model::ModelError;

/// Errors reported back to the presentation layer
///
/// None of these change the wizard state.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Bad form value or a missing required selection; blocks advancing
    #[error("{0}")]
    InvalidInput(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, cleaned: String },

    /// Missing API key or unknown provider; model calls stay disabled
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}

impl WizardError {
    pub fn invalid(message: impl Into<String>) -> Self {
        WizardError::InvalidInput(message.into())
    }

    /// Whether `/retry` may help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WizardError::ModelUnavailable(_) | WizardError::MalformedResponse { .. }
        )
    }
}

impl From<ModelError> for WizardError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoResponse { reason } => WizardError::ModelUnavailable(reason),
            ModelError::MalformedResponse { reason, cleaned } => WizardError::MalformedResponse { reason, cleaned },
            ModelError::Configuration(message) => WizardError::Configuration(message),
            ModelError::EmptyPrompt => WizardError::Template("rendered prompt is empty".to_string()),
        }
    }
}

impl From<eyre::Report> for WizardError {
    fn from(err: eyre::Report) -> Self {
        WizardError::Template(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_model_error() {
        let err: WizardError = ModelError::NoResponse { reason: "timeout".into() }.into();
        assert!(matches!(err, WizardError::ModelUnavailable(_)));
        assert!(err.is_retryable());

        let err: WizardError = ModelError::Configuration("no key".into()).into();
        assert!(matches!(err, WizardError::Configuration(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_input_display() {
        assert_eq!(WizardError::invalid("Pick a city").to_string(), "Pick a city");
    }
}
