//! Response shaping
//!
//! Stored documents carry the store's identity field (`_id`, usually wrapped as
//! `{"$oid": ...}`). Callers only ever see the flat [`Card`] shape.

use serde_json::Value;

use super::dispatcher::DispatchOutcome;
use super::reply::AssistantReply;
use crate::domain::{Card, CardId, UserId};
use crate::error::{FlashcallError, Result};
use crate::storage::{BACK_FIELD, Document, FRONT_FIELD, ID_FIELD, OWNER_FIELD, object_id_str};
use crate::tools::ToolName;

fn string_field<'a>(doc: &'a Document, field: &str) -> Result<&'a str> {
    doc.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| FlashcallError::StoreUnavailable(format!("Stored card has no string '{}'", field)))
}

fn identity_field<'a>(doc: &'a Document, field: &str) -> Result<&'a str> {
    doc.get(field)
        .and_then(object_id_str)
        .ok_or_else(|| FlashcallError::StoreUnavailable(format!("Stored card has no usable '{}'", field)))
}

/// Flatten a stored document into the public card shape.
///
/// Pure: the same document always yields the same card.
pub fn shape_document(doc: &Document) -> Result<Card> {
    Ok(Card {
        front: string_field(doc, FRONT_FIELD)?.to_string(),
        back: string_field(doc, BACK_FIELD)?.to_string(),
        owner_id: UserId::new(identity_field(doc, OWNER_FIELD)?),
        id: CardId::new(identity_field(doc, ID_FIELD)?),
    })
}

/// Build the reply envelope for a dispatch outcome
pub fn shape(outcome: DispatchOutcome) -> Result<AssistantReply> {
    match outcome {
        DispatchOutcome::Added { id, front, back, owner } => Ok(AssistantReply::tool(
            ToolName::AddFlashcard,
            Some(Card {
                front,
                back,
                owner_id: owner,
                id,
            }),
        )),
        DispatchOutcome::Quizzed(Some(doc)) => {
            Ok(AssistantReply::tool(ToolName::QuizUser, Some(shape_document(&doc)?)))
        }
        DispatchOutcome::Quizzed(None) => Ok(AssistantReply::tool(ToolName::QuizUser, None)),
        DispatchOutcome::PassedThrough(text) => Ok(AssistantReply::text(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_shape_document_flattens_wrapped_ids() {
        let stored = doc(json!({
            "_id": {"$oid": "671140a0c3f1e2d4b5a69788"},
            "front": "Hola",
            "back": "Hello",
            "userId": {"$oid": "650000000000000000000abc"}
        }));

        let card = shape_document(&stored).unwrap();
        assert_eq!(card.id.as_str(), "671140a0c3f1e2d4b5a69788");
        assert_eq!(card.owner_id.as_str(), "650000000000000000000abc");
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "front": "Hola",
                "back": "Hello",
                "userId": "650000000000000000000abc",
                "id": "671140a0c3f1e2d4b5a69788"
            })
        );
    }

    #[test]
    fn test_shape_document_plain_ids() {
        let stored = doc(json!({"_id": "abc", "front": "f", "back": "b", "userId": "u1"}));
        let card = shape_document(&stored).unwrap();
        assert_eq!(card.id.as_str(), "abc");
        assert_eq!(card.owner_id.as_str(), "u1");
    }

    #[test]
    fn test_shape_document_is_byte_identical_twice() {
        let stored = doc(json!({"_id": {"$oid": "0123456789abcdef01234567"}, "front": "f", "back": "b", "userId": "u1"}));
        let first = serde_json::to_string(&shape_document(&stored).unwrap()).unwrap();
        let second = serde_json::to_string(&shape_document(&stored).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_document_rejects_missing_fields() {
        let no_id = doc(json!({"front": "f", "back": "b", "userId": "u1"}));
        assert!(matches!(shape_document(&no_id), Err(FlashcallError::StoreUnavailable(_))));

        let numeric_back = doc(json!({"_id": "x", "front": "f", "back": 4, "userId": "u1"}));
        assert!(matches!(
            shape_document(&numeric_back),
            Err(FlashcallError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_shape_added_uses_arguments_and_new_id() {
        let reply = shape(DispatchOutcome::Added {
            id: CardId::new("id1"),
            front: "2+2".to_string(),
            back: "4".to_string(),
            owner: UserId::new("u1"),
        })
        .unwrap();

        assert_eq!(reply.tool_called, Some(ToolName::AddFlashcard));
        let card = reply.card().unwrap();
        assert_eq!(card.front, "2+2");
        assert_eq!(card.back, "4");
        assert_eq!(card.id.as_str(), "id1");
    }

    #[test]
    fn test_shape_empty_quiz() {
        let reply = shape(DispatchOutcome::Quizzed(None)).unwrap();
        assert_eq!(reply.tool_called, Some(ToolName::QuizUser));
        assert!(reply.response.is_none());
    }

    #[test]
    fn test_shape_passthrough_is_verbatim() {
        let text = "  Paris is the capital.\n";
        let reply = shape(DispatchOutcome::PassedThrough(text.to_string())).unwrap();
        assert_eq!(reply.as_text(), Some(text));
        assert!(reply.tool_called.is_none());
    }
}
