//! Static tool catalog
//!
//! The two card operations the generation service may propose. The catalog is
//! declared here, not loaded at runtime, and is the only contract handed to the
//! service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::llm::ToolDefinition;

/// Names of the tools in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolName {
    #[serde(rename = "addFlashcardTool")]
    AddFlashcard,
    #[serde(rename = "quizUserTool")]
    QuizUser,
}

impl ToolName {
    /// Every tool, in declaration order
    pub const ALL: [ToolName; 2] = [ToolName::AddFlashcard, ToolName::QuizUser];

    /// Wire name used by the generation service
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AddFlashcard => "addFlashcardTool",
            ToolName::QuizUser => "quizUserTool",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::AddFlashcard => "Create a new flashcard for the user.",
            ToolName::QuizUser => "Pick one random flashcard belonging to the user and return it.",
        }
    }

    /// JSON Schema for the tool's arguments
    pub fn input_schema(&self) -> Value {
        match self {
            ToolName::AddFlashcard => json!({
                "type": "object",
                "properties": {
                    "front": {
                        "type": "string",
                        "description": "The question/prompt side of the flashcard."
                    },
                    "back": {
                        "type": "string",
                        "description": "The answer/explanation side of the flashcard."
                    }
                },
                "required": ["front", "back"],
                "additionalProperties": false
            }),
            ToolName::QuizUser => json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            }),
        }
    }

    /// Argument names that must be present as strings
    pub fn required_args(&self) -> &'static [&'static str] {
        match self {
            ToolName::AddFlashcard => &["front", "back"],
            ToolName::QuizUser => &[],
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.as_str(), self.description(), self.input_schema())
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a name outside the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl fmt::Display for UnknownTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool: {}", self.0)
    }
}

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Tool declarations passed to the generation service
pub fn tool_catalog() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}
