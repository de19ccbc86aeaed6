//! The reply envelope returned for every assisted message

use serde::{Deserialize, Serialize};

use crate::domain::Card;
use crate::tools::ToolName;

/// What the caller gets back in `response`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    Text(String),
    Card(Card),
}

/// `{"response": ..., "toolCalled": ...}`
///
/// Both fields are always present; absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: Option<ReplyPayload>,
    #[serde(rename = "toolCalled")]
    pub tool_called: Option<ToolName>,
}

impl AssistantReply {
    /// Plain generated text; no tool fired
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: Some(ReplyPayload::Text(text.into())),
            tool_called: None,
        }
    }

    /// Result of a tool that produced a card, or nothing
    pub fn tool(tool: ToolName, card: Option<Card>) -> Self {
        Self {
            response: card.map(ReplyPayload::Card),
            tool_called: Some(tool),
        }
    }

    pub fn card(&self) -> Option<&Card> {
        match &self.response {
            Some(ReplyPayload::Card(card)) => Some(card),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.response {
            Some(ReplyPayload::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CardId, UserId};
    use serde_json::json;

    fn card() -> Card {
        Card {
            front: "2+2".to_string(),
            back: "4".to_string(),
            owner_id: UserId::new("u1"),
            id: CardId::new("671140a0c3f1e2d4b5a69788"),
        }
    }

    #[test]
    fn test_text_reply_serializes_null_tool() {
        let value = serde_json::to_value(AssistantReply::text("Paris.")).unwrap();
        assert_eq!(value, json!({"response": "Paris.", "toolCalled": null}));
    }

    #[test]
    fn test_tool_reply_serializes_card() {
        let value = serde_json::to_value(AssistantReply::tool(ToolName::AddFlashcard, Some(card()))).unwrap();
        assert_eq!(value["toolCalled"], "addFlashcardTool");
        assert_eq!(value["response"]["front"], "2+2");
        assert_eq!(value["response"]["id"], "671140a0c3f1e2d4b5a69788");
    }

    #[test]
    fn test_empty_quiz_serializes_null_response() {
        let value = serde_json::to_value(AssistantReply::tool(ToolName::QuizUser, None)).unwrap();
        assert_eq!(value, json!({"response": null, "toolCalled": "quizUserTool"}));
    }

    #[test]
    fn test_reply_parses_back() {
        let json = r#"{"response":{"front":"2+2","back":"4","userId":"u1","id":"671140a0c3f1e2d4b5a69788"},"toolCalled":"addFlashcardTool"}"#;
        let reply: AssistantReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.card(), Some(&card()));
        assert_eq!(reply.tool_called, Some(ToolName::AddFlashcard));

        let reply: AssistantReply = serde_json::from_str(r#"{"response":"hi","toolCalled":null}"#).unwrap();
        assert_eq!(reply.as_text(), Some("hi"));
        assert!(reply.card().is_none());
    }
}
