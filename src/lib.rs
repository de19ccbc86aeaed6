//! Flashcall - a chat assistant for personal flashcards
//!
//! Free-text messages are routed through a generation service that may propose
//! one of two card tools (add a card, quiz the user). At most one proposal is
//! executed against the card store, and every outcome is shaped into the same
//! `{"response", "toolCalled"}` envelope.

pub mod assistant;
pub mod config;
pub mod daemon;
pub mod domain;
pub mod error;
pub mod id;
pub mod ipc;
pub mod llm;
pub mod storage;
pub mod tools;

pub use error::{FlashcallError, Result};
