//! Tool dispatch: one routed message, at most one card store call

use std::sync::Arc;

use super::router::{Routed, ToolInvocation};
use crate::domain::{CardId, UserId};
use crate::error::{FlashcallError, Result};
use crate::storage::{CardStore, Document};

/// What dispatching produced, before shaping
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A card was inserted for `owner`
    Added {
        id: CardId,
        front: String,
        back: String,
        owner: UserId,
    },
    /// A sampled document, or `None` when the owner has no cards
    Quizzed(Option<Document>),
    /// No tool was proposed
    PassedThrough(String),
}

pub struct ToolDispatcher {
    store: Arc<dyn CardStore>,
}

impl ToolDispatcher {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, user: &UserId, routed: Routed) -> Result<DispatchOutcome> {
        let invocation = match routed {
            Routed::Text(text) => return Ok(DispatchOutcome::PassedThrough(text)),
            Routed::Invocation(invocation) => invocation,
        };

        log::info!("Dispatching {} for {}", invocation.name(), user);

        match invocation {
            ToolInvocation::AddFlashcard { front, back } => {
                let id = self
                    .store
                    .insert_card(&front, &back, user)
                    .await
                    .map_err(as_store_failure)?;
                log::info!("Added card {} for {}", id, user);
                Ok(DispatchOutcome::Added {
                    id,
                    front,
                    back,
                    owner: user.clone(),
                })
            }
            ToolInvocation::QuizUser => {
                let doc = self.store.sample_one_card(user).await.map_err(as_store_failure)?;
                if doc.is_none() {
                    log::info!("No cards to quiz for {}", user);
                }
                Ok(DispatchOutcome::Quizzed(doc))
            }
        }
    }
}

fn as_store_failure(e: FlashcallError) -> FlashcallError {
    match e {
        e @ FlashcallError::StoreUnavailable(_) => e,
        other => FlashcallError::StoreUnavailable(other.to_string()),
    }
}
