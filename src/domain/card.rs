//! Card identity and the public card shape

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an authenticated caller, as handed over by the auth boundary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Store-assigned card identity, in canonical string form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card as callers see it: storage identity flattened into `id`.
///
/// Add results and quiz results both serialize to this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub id: CardId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_serializes_flat() {
        let card = Card {
            front: "Hola".to_string(),
            back: "Hello".to_string(),
            owner_id: UserId::new("u1"),
            id: CardId::new("671140a0c3f1e2d4b5a69788"),
        };

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(
            value,
            json!({
                "front": "Hola",
                "back": "Hello",
                "userId": "u1",
                "id": "671140a0c3f1e2d4b5a69788"
            })
        );
    }

    #[test]
    fn test_ids_display_raw() {
        assert_eq!(UserId::from("alice").to_string(), "alice");
        assert_eq!(CardId::new("abc").to_string(), "abc");
        assert_eq!(CardId::new("abc").into_string(), "abc");
    }
}
