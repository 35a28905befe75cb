//! LLM request/response types for Tripwise

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A generation request - one prompt, one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Fully substituted prompt text
    pub prompt: String,

    /// Ask the model for machine-readable JSON output
    pub expect_json: bool,
}

impl GenerateRequest {
    /// Request a JSON reply
    pub fn json(prompt: impl Into<String>) -> Self {
        debug!("GenerateRequest::json: called");
        Self {
            prompt: prompt.into(),
            expect_json: true,
        }
    }

    /// Request a free-text reply
    pub fn text(prompt: impl Into<String>) -> Self {
        debug!("GenerateRequest::text: called");
        Self {
            prompt: prompt.into(),
            expect_json: false,
        }
    }
}

/// Reply from a generation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Raw reply text, exactly as the model produced it
    pub text: String,

    /// Why the model stopped, as reported by the provider
    pub finish_reason: Option<String>,

    /// Token usage
    pub usage: TokenUsage,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Harm categories the model filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Probability threshold at which content is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

/// One safety filter setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

/// Block medium-and-above harassment, hate, sexual and dangerous content
pub const DEFAULT_SAFETY_SETTINGS: [SafetySetting; 4] = [
    SafetySetting {
        category: HarmCategory::Harassment,
        threshold: BlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::HateSpeech,
        threshold: BlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::SexuallyExplicit,
        threshold: BlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: BlockThreshold::BlockMediumAndAbove,
    },
];
