//! LLM Client Layer - generation service integration
//!
//! This module provides:
//! - Request/response types for a single completion turn
//! - LlmClient trait for API abstraction, with a scripted mock
//! - GeminiClient and AnthropicClient implementations

pub mod anthropic;
pub mod client;
pub mod gemini;
pub mod types;

use std::sync::Arc;

pub use anthropic::AnthropicClient;
pub use client::{LlmClient, MockLlmClient};
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, ToolCall, ToolDefinition, Usage};

use crate::config::{LlmConfig, Provider};
use crate::error::Result;

/// Construct the client for the configured provider
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match config.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(config)?),
        Provider::Anthropic => Arc::new(AnthropicClient::new(config)?),
    };
    log::info!("Using {:?} generation service, model {}", config.provider, client.model());
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashcallError;

    #[test]
    fn test_build_client_requires_key() {
        let config = LlmConfig {
            api_key_env: Some("FLASHCALL_TEST_UNSET_KEY".to_string()),
            ..Default::default()
        };
        let err = build_client(&config).err().unwrap();
        assert!(matches!(err, FlashcallError::Config(_)));
    }
}
