//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Implementations send exactly one request per call and never retry;
/// retries are always the user's decision.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single prompt and wait for the complete reply
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Human-readable provider/model name for logs and banners
    fn name(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Scripted outcome for one mock call
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Text(String),
        NoCandidates,
        Api(u16),
    }

    /// Mock LLM client for unit tests
    ///
    /// Replays `replies` in order and records every request it receives.
    pub struct MockLlmClient {
        replies: Vec<MockReply>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<MockReply>) -> Self {
            debug!(reply_count = %replies.len(), "MockLlmClient::new: called");
            Self {
                replies,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Mock that answers with each text in turn
        pub fn with_texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| MockReply::Text(t.to_string())).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Prompts received so far, in order
        pub fn prompts(&self) -> Vec<String> {
            self.requests().into_iter().map(|r| r.prompt).collect()
        }

        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            debug!("MockLlmClient::generate: called");
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(idx).cloned() {
                Some(MockReply::Text(text)) => Ok(GenerateResponse::from_text(text)),
                Some(MockReply::NoCandidates) => Err(LlmError::NoCandidates {
                    reason: Some("SAFETY".to_string()),
                }),
                Some(MockReply::Api(status)) => Err(LlmError::Api {
                    status,
                    message: "mock failure".to_string(),
                }),
                None => {
                    debug!("MockLlmClient::generate: no more mock replies");
                    Err(LlmError::InvalidResponse("No more mock replies".to_string()))
                }
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_replies() {
            let client = MockLlmClient::with_texts(&["Reply 1", "Reply 2"]);

            let r1 = client.generate(GenerateRequest::json("first")).await.unwrap();
            assert_eq!(r1.text, "Reply 1");

            let r2 = client.generate(GenerateRequest::text("second")).await.unwrap();
            assert_eq!(r2.text, "Reply 2");

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.prompts(), vec!["first", "second"]);
            assert!(client.requests()[0].expect_json);
        }

        #[tokio::test]
        async fn test_mock_client_scripted_failures() {
            let client = MockLlmClient::new(vec![MockReply::NoCandidates, MockReply::Api(503)]);

            let err = client.generate(GenerateRequest::json("a")).await.unwrap_err();
            assert!(err.is_safety_block());

            let err = client.generate(GenerateRequest::json("b")).await.unwrap_err();
            assert_eq!(err.status(), Some(503));

            assert!(client.generate(GenerateRequest::json("c")).await.is_err());
        }
    }
}
