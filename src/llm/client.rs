//! Generation service trait and a scripted mock for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{FlashcallError, Result};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion turn (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool;
}

/// Scripted client: returns queued responses in order and records every request.
///
/// An exhausted queue behaves like an unreachable service.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<std::result::Result<CompletionResponse, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Create a mock that answers with `responses`, one per call
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose next call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::default();
        mock.push_failure(message);
        mock
    }

    /// Queue another response
    pub fn push_response(&self, response: CompletionResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(response));
    }

    /// Queue a failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(message.into()));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of completion calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(FlashcallError::GenerationServiceUnavailable(message)),
            None => Err(FlashcallError::GenerationServiceUnavailable(
                "mock has no scripted responses left".to_string(),
            )),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_returns_responses_in_order() {
        let mock = MockLlmClient::new(vec![
            CompletionResponse::text("first"),
            CompletionResponse::tool_call("quizUserTool", json!({})),
        ]);

        let r1 = mock.complete(CompletionRequest::new("a")).await.unwrap();
        let r2 = mock.complete(CompletionRequest::new("b")).await.unwrap();

        assert_eq!(r1.text.as_deref(), Some("first"));
        assert_eq!(r2.tool_calls[0].name, "quizUserTool");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requests()[1].prompt, "b");
    }

    #[tokio::test]
    async fn test_mock_exhausted_is_unavailable() {
        let mock = MockLlmClient::new(vec![]);
        let err = mock.complete(CompletionRequest::new("a")).await.unwrap_err();
        assert!(matches!(err, FlashcallError::GenerationServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let mock = MockLlmClient::failing("503 upstream");
        let err = mock.complete(CompletionRequest::new("a")).await.unwrap_err();
        assert!(err.to_string().contains("503 upstream"));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_identity() {
        let mock = MockLlmClient::default();
        assert!(mock.is_ready());
        assert_eq!(mock.model(), "mock-model");
    }
}
