//! Gemini API client implementation
//!
//! This module implements the LlmClient trait for the Gemini `generateContent` API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::error::{FlashcallError, Result};
use crate::llm::client::LlmClient;
use crate::llm::types::{CompletionRequest, CompletionResponse, ToolCall, Usage};

/// Gemini API base URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    usage: Arc<Mutex<Usage>>,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// Reads the API key from the environment variable named in the config
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FlashcallError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            model: config.model().to_string(),
            max_tokens: config.max_tokens,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Build the request body for the Gemini API
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let max_tokens = request.max_tokens.unwrap_or(self.max_tokens);

        let mut body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [ { "text": request.prompt } ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": max_tokens
            }
        });

        if !request.tools.is_empty() {
            let declarations: Vec<Value> = request.tools.iter().map(|t| t.to_gemini_declaration()).collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse> {
        let candidate = body["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| {
                let reason = body["promptFeedback"]["blockReason"]
                    .as_str()
                    .unwrap_or("no candidates returned");
                FlashcallError::GenerationServiceUnavailable(format!("Empty completion: {}", reason))
            })?;

        let usage = match body.get("usageMetadata") {
            Some(u) => Usage::new(
                u["promptTokenCount"].as_u64().unwrap_or(0),
                u["candidatesTokenCount"].as_u64().unwrap_or(0),
            ),
            None => Usage::default(),
        };

        // Track cumulative usage
        self.usage
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .add(&usage);

        let mut text: Option<String> = None;
        let mut tool_calls = Vec::new();

        if let Some(parts) = candidate["content"]["parts"].as_array() {
            for part in parts {
                if let Some(t) = part["text"].as_str() {
                    text.get_or_insert_with(String::new).push_str(t);
                } else if let Some(call) = part.get("functionCall") {
                    let name = call["name"].as_str().unwrap_or("").to_string();
                    let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
                    tool_calls.push(ToolCall::new(name, args));
                }
            }
        }

        Ok(CompletionResponse { text, tool_calls, usage })
    }

    /// Send a request to the Gemini API
    async fn send_request(&self, model: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| FlashcallError::GenerationServiceUnavailable(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FlashcallError::GenerationServiceUnavailable(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| {
                FlashcallError::GenerationServiceUnavailable(format!("Failed to parse response: {}", e.without_url()))
            })
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let body = self.build_request(&request);
        let response = self.send_request(&model, body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
