//! ModelClient: the single model entry point used by the wizard

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::cleanup::clean_json;
use super::error::ModelError;
use crate::config::LlmConfig;
use crate::llm::{GenerateRequest, LlmClient, create_client};

/// Successful reply from [`ModelClient::invoke`]
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Cleaned and parsed JSON
    Json(Value),
    /// Raw reply text, unmodified
    Text(String),
}

impl ModelReply {
    pub fn into_json(self) -> Option<Value> {
        match self {
            ModelReply::Json(value) => Some(value),
            ModelReply::Text(_) => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ModelReply::Json(value) => value.to_string(),
            ModelReply::Text(text) => text,
        }
    }
}

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn LlmClient>),
    /// Why no client could be built; reported by every call
    Unconfigured(String),
}

/// Sends prompts and turns replies into JSON or text
///
/// Built even when the API key is missing, so the rest of the wizard keeps
/// working; model calls then fail with [`ModelError::Configuration`].
#[derive(Clone)]
pub struct ModelClient {
    backend: Backend,
}

impl ModelClient {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        debug!(name = %llm.name(), "ModelClient::new: called");
        Self {
            backend: Backend::Ready(llm),
        }
    }

    pub fn unconfigured(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug!(%reason, "ModelClient::unconfigured: called");
        Self {
            backend: Backend::Unconfigured(reason),
        }
    }

    /// Build the configured provider, or an unconfigured client carrying the error
    pub fn from_config(config: &LlmConfig) -> Self {
        debug!(provider = %config.provider, "ModelClient::from_config: called");
        match create_client(config) {
            Ok(llm) => Self::new(llm),
            Err(e) => {
                warn!(error = %e, "ModelClient::from_config: model calls disabled");
                Self::unconfigured(e.to_string())
            }
        }
    }

    /// The configuration problem, if model calls are disabled
    pub fn configuration_error(&self) -> Option<&str> {
        match &self.backend {
            Backend::Ready(_) => None,
            Backend::Unconfigured(reason) => Some(reason),
        }
    }

    pub fn name(&self) -> &str {
        match &self.backend {
            Backend::Ready(llm) => llm.name(),
            Backend::Unconfigured(_) => "unconfigured",
        }
    }

    /// Send one prompt
    ///
    /// With `expect_json` the reply is cleaned and parsed; otherwise the raw
    /// text is returned as-is. Never retries.
    pub async fn invoke(&self, prompt: &str, expect_json: bool) -> Result<ModelReply, ModelError> {
        debug!(prompt_len = prompt.len(), expect_json, "ModelClient::invoke: called");
        if prompt.trim().is_empty() {
            return Err(ModelError::EmptyPrompt);
        }

        let llm = match &self.backend {
            Backend::Ready(llm) => llm,
            Backend::Unconfigured(reason) => return Err(ModelError::Configuration(reason.clone())),
        };

        let request = if expect_json {
            GenerateRequest::json(prompt)
        } else {
            GenerateRequest::text(prompt)
        };

        info!(model = %llm.name(), expect_json, "Calling model");
        let response = llm.generate(request).await.map_err(|e| {
            warn!(error = %e, "ModelClient::invoke: model call failed");
            ModelError::from(e)
        })?;

        if !expect_json {
            return Ok(ModelReply::Text(response.text));
        }

        let cleaned = clean_json(&response.text);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => Ok(ModelReply::Json(value)),
            Err(e) => {
                warn!(error = %e, cleaned_len = cleaned.len(), "ModelClient::invoke: reply is not valid JSON");
                Err(ModelError::MalformedResponse {
                    reason: e.to_string(),
                    cleaned,
                })
            }
        }
    }

    /// Send a prompt and validate the reply against `T`
    ///
    /// Missing keys or wrong types are [`ModelError::MalformedResponse`].
    pub async fn invoke_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, ModelError> {
        debug!(target_type = std::any::type_name::<T>(), "ModelClient::invoke_json: called");
        let value = match self.invoke(prompt, true).await? {
            ModelReply::Json(value) => value,
            ModelReply::Text(text) => {
                return Err(ModelError::MalformedResponse {
                    reason: "expected a JSON reply".to_string(),
                    cleaned: text,
                });
            }
        };

        serde_json::from_value::<T>(value.clone()).map_err(|e| {
            warn!(error = %e, "ModelClient::invoke_json: unexpected reply shape");
            ModelError::MalformedResponse {
                reason: format!("unexpected reply shape: {}", e),
                cleaned: value.to_string(),
            }
        })
    }
}
