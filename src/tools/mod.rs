//! Tool system for LLM interactions
//!
//! Flashcall exposes a fixed catalog of card tools. The generation service only
//! proposes a tool name and arguments; execution happens in the dispatcher.

mod catalog;

pub use catalog::{ToolName, UnknownTool, tool_catalog};
