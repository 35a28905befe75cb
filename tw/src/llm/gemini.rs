//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{DEFAULT_SAFETY_SETTINGS, GenerateRequest, GenerateResponse, LlmClient, LlmError, SafetySetting, TokenUsage};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    name: String,
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable or file named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Self::new(config, api_key)
    }

    /// Create a client with an explicit API key
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "new: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            name: format!("Gemini {}", config.model),
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            safety_settings: DEFAULT_SAFETY_SETTINGS.to_vec(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &GenerateRequest) -> serde_json::Value {
        debug!(%self.model, expect_json = request.expect_json, "build_request_body: called");
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "safetySettings": self.safety_settings,
        });

        let mut generation_config = serde_json::Map::new();
        if request.expect_json {
            generation_config.insert("responseMimeType".to_string(), serde_json::json!("application/json"));
        }
        if let Some(temperature) = self.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temperature));
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_output_tokens));
        }

        if !generation_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation_config);
        }

        body
    }

    /// Parse the Gemini API response
    ///
    /// The reply text is the concatenation of the first candidate's text parts.
    fn parse_response(&self, api_response: GeminiResponse) -> Result<GenerateResponse, LlmError> {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");
        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("blockReason: {}", r));
            warn!(?reason, "parse_response: no candidates");
            return Err(LlmError::NoCandidates { reason });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            warn!(finish_reason = ?candidate.finish_reason, "parse_response: candidate without text");
            return Err(LlmError::NoCandidates {
                reason: candidate.finish_reason,
            });
        }

        Ok(GenerateResponse {
            text,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        debug!(%self.model, prompt_len = request.prompt.len(), "generate: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "generate: API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse Gemini response: {}", e)))?;

        let reply = self.parse_response(api_response)?;
        debug!(
            reply_len = reply.text.len(),
            input_tokens = reply.usage.input_tokens,
            output_tokens = reply.usage.output_tokens,
            "generate: success"
        );
        Ok(reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        let config = LlmConfig {
            base_url: server.url(),
            ..Default::default()
        };
        GeminiClient::new(&config, "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_build_request_body_json() {
        let config = LlmConfig::default();
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();

        let body = client.build_request_body(&GenerateRequest::json("Suggest cities"));

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Suggest cities");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][1]["category"], "HARM_CATEGORY_HATE_SPEECH");
    }

    #[test]
    fn test_build_request_body_text_has_no_generation_config() {
        let config = LlmConfig::default();
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();

        let body = client.build_request_body(&GenerateRequest::text("hello"));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_build_request_body_sampling_options() {
        let config = LlmConfig {
            temperature: Some(0.5),
            max_output_tokens: Some(2048),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();

        let body = client.build_request_body(&GenerateRequest::text("hello"));
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let reply = client.generate(GenerateRequest::json("prompt")).await.unwrap();

        assert_eq!(reply.text, "[{\"a\":1}]");
        assert_eq!(reply.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(reply.usage.input_tokens, 12);
        assert_eq!(reply.usage.output_tokens, 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate(GenerateRequest::json("prompt")).await.unwrap_err();

        assert!(matches!(err, LlmError::NoCandidates { .. }));
        assert!(err.is_safety_block());
    }

    #[tokio::test]
    async fn test_generate_candidate_without_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate(GenerateRequest::text("prompt")).await.unwrap_err();

        assert!(err.is_safety_block());
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ENDPOINT)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate(GenerateRequest::json("prompt")).await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(err.is_auth());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_generate_does_not_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .with_status(503)
            .with_body("overloaded")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.generate(GenerateRequest::json("prompt")).await.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_unparseable_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_body("<html>proxy error</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate(GenerateRequest::json("prompt")).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
