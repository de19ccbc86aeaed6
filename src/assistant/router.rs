//! Intent routing
//!
//! One completion turn per message. The service either answers in text or
//! proposes a tool call; proposals are checked for shape here, before anything
//! touches the card store.

use std::sync::Arc;

use serde_json::Value;

use super::prompt::build_prompt;
use crate::domain::UserId;
use crate::error::{FlashcallError, Result};
use crate::llm::{CompletionRequest, LlmClient, ToolCall};
use crate::tools::{ToolName, tool_catalog};

/// A validated tool call, ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    AddFlashcard { front: String, back: String },
    QuizUser,
}

impl ToolInvocation {
    pub fn name(&self) -> ToolName {
        match self {
            ToolInvocation::AddFlashcard { .. } => ToolName::AddFlashcard,
            ToolInvocation::QuizUser => ToolName::QuizUser,
        }
    }

    /// Check a proposed call against the catalog.
    ///
    /// Unknown names and missing, non-string or blank required arguments are
    /// rejected. Arguments the tool does not declare are ignored.
    pub fn from_call(call: &ToolCall) -> Result<Self> {
        let name: ToolName = call
            .name
            .parse()
            .map_err(|e| FlashcallError::MalformedToolInvocation(format!("{}", e)))?;

        let values = name
            .required_args()
            .iter()
            .map(|field| required_string(&call.args, name, field))
            .collect::<Result<Vec<_>>>()?;

        match (name, values.as_slice()) {
            (ToolName::AddFlashcard, [front, back]) => Ok(ToolInvocation::AddFlashcard {
                front: front.clone(),
                back: back.clone(),
            }),
            (ToolName::QuizUser, []) => Ok(ToolInvocation::QuizUser),
            _ => Err(FlashcallError::MalformedToolInvocation(format!(
                "Tool '{}' argument list does not match its declaration",
                name
            ))),
        }
    }
}

fn required_string(args: &Value, tool: ToolName, field: &str) -> Result<String> {
    match args.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(FlashcallError::MalformedToolInvocation(format!(
            "Tool '{}' has empty argument: {}",
            tool, field
        ))),
        Some(other) => Err(FlashcallError::MalformedToolInvocation(format!(
            "Tool '{}' argument '{}' is not a string: {}",
            tool, field, other
        ))),
        None => Err(FlashcallError::MalformedToolInvocation(format!(
            "Tool '{}' missing required field: {}",
            tool, field
        ))),
    }
}

/// Outcome of routing one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// No tool proposed; the generated text, verbatim
    Text(String),
    Invocation(ToolInvocation),
}

/// Sends messages to the generation service with the tool catalog attached
pub struct IntentRouter {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl IntentRouter {
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Model the router sends requests to
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    pub fn is_ready(&self) -> bool {
        self.llm.is_ready()
    }

    pub async fn route(&self, user: &UserId, message: &str) -> Result<Routed> {
        let request = CompletionRequest::new(build_prompt(message))
            .with_tools(tool_catalog())
            .with_max_tokens(self.max_tokens);
        log::debug!("Routing message for {} ({} chars)", user, message.len());

        let response = self.llm.complete(request).await.map_err(|e| match e {
            e @ FlashcallError::GenerationServiceUnavailable(_) => e,
            other => FlashcallError::GenerationServiceUnavailable(other.to_string()),
        })?;

        let Some(call) = response.first_tool_call().cloned() else {
            return Ok(Routed::Text(response.text.unwrap_or_default()));
        };

        if response.tool_calls.len() > 1 {
            log::warn!(
                "Generation service proposed {} tool calls; honoring only {}",
                response.tool_calls.len(),
                call.name
            );
        }

        match ToolInvocation::from_call(&call) {
            Ok(invocation) => Ok(Routed::Invocation(invocation)),
            Err(e) => {
                log::warn!("Rejected tool invocation for {}: {}", user, e);
                Err(e)
            }
        }
    }
}
