//! LLM error types

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Model returned no candidates ({})", .reason.as_deref().unwrap_or("no reason given"))]
    NoCandidates { reason: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if the model withheld its reply for safety reasons
    pub fn is_safety_block(&self) -> bool {
        match self {
            LlmError::NoCandidates { reason: Some(reason) } => {
                let reason = reason.to_uppercase();
                reason.contains("SAFETY") || reason.contains("BLOCK")
            }
            _ => false,
        }
    }

    /// Check if the error comes from missing or rejected credentials
    pub fn is_auth(&self) -> bool {
        match self {
            LlmError::Configuration(_) => true,
            LlmError::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// HTTP status, when the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safety_block() {
        assert!(
            LlmError::NoCandidates {
                reason: Some("SAFETY".to_string())
            }
            .is_safety_block()
        );
        assert!(
            LlmError::NoCandidates {
                reason: Some("blockReason: OTHER".to_string())
            }
            .is_safety_block()
        );
        assert!(!LlmError::NoCandidates { reason: None }.is_safety_block());
        assert!(!LlmError::InvalidResponse("x".to_string()).is_safety_block());
    }

    #[test]
    fn test_is_auth() {
        assert!(LlmError::Configuration("no key".to_string()).is_auth());
        assert!(
            LlmError::Api {
                status: 403,
                message: "forbidden".to_string()
            }
            .is_auth()
        );
        assert!(
            !LlmError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .is_auth()
        );
    }

    #[test]
    fn test_display_no_candidates() {
        let err = LlmError::NoCandidates { reason: None };
        assert_eq!(err.to_string(), "Model returned no candidates (no reason given)");

        let err = LlmError::NoCandidates {
            reason: Some("SAFETY".to_string()),
        };
        assert_eq!(err.to_string(), "Model returned no candidates (SAFETY)");
    }

    #[test]
    fn test_status() {
        let err = LlmError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(LlmError::NoCandidates { reason: None }.status(), None);
    }
}
