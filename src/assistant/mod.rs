//! The assist pipeline
//!
//! message → [`IntentRouter`] → [`ToolDispatcher`] → [`shape`] → [`AssistantReply`]
//!
//! Every request is independent. Nothing here is retried; the first failing
//! stage ends the request.

mod dispatcher;
mod prompt;
mod reply;
mod router;
mod shaper;

use std::fmt;
use std::sync::Arc;

pub use dispatcher::{DispatchOutcome, ToolDispatcher};
pub use prompt::{INSTRUCTION_PROMPT, build_prompt};
pub use reply::{AssistantReply, ReplyPayload};
pub use router::{IntentRouter, Routed, ToolInvocation};
pub use shaper::{shape, shape_document};

use crate::domain::UserId;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::storage::CardStore;

/// Per-request progress, logged at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Routed,
    Dispatched,
    PassedThrough,
    Shaped,
    Done,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStage::Received => "received",
            RequestStage::Routed => "routed",
            RequestStage::Dispatched => "dispatched",
            RequestStage::PassedThrough => "passed-through",
            RequestStage::Shaped => "shaped",
            RequestStage::Done => "done",
        };
        f.write_str(s)
    }
}

/// Chat assistant over a generation service and a card store
pub struct Assistant {
    router: IntentRouter,
    dispatcher: ToolDispatcher,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn CardStore>, max_tokens: u32) -> Self {
        Self {
            router: IntentRouter::new(llm, max_tokens),
            dispatcher: ToolDispatcher::new(store),
        }
    }

    /// Model used for routing
    pub fn model(&self) -> &str {
        self.router.model()
    }

    /// Whether the generation service client can make calls
    pub fn is_ready(&self) -> bool {
        self.router.is_ready()
    }

    /// Handle one message from an already authenticated user
    pub async fn assist(&self, user: &UserId, message: &str) -> Result<AssistantReply> {
        log::debug!("assist[{}]: {}", user, RequestStage::Received);

        let routed = self.router.route(user, message).await?;
        log::debug!("assist[{}]: {}", user, RequestStage::Routed);

        let stage = match routed {
            Routed::Text(_) => RequestStage::PassedThrough,
            Routed::Invocation(_) => RequestStage::Dispatched,
        };
        let outcome = self.dispatcher.dispatch(user, routed).await?;
        log::debug!("assist[{}]: {}", user, stage);

        let reply = shape(outcome)?;
        log::debug!("assist[{}]: {} -> {}", user, RequestStage::Shaped, RequestStage::Done);
        Ok(reply)
    }
}
