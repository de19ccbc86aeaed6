//! Card store trait, document helpers and filter types.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{CardId, UserId};
use crate::error::Result;

/// A stored card document, exactly as the collection holds it
pub type Document = Map<String, Value>;

/// Storage-native identity field
pub const ID_FIELD: &str = "_id";
/// Owner reference field
pub const OWNER_FIELD: &str = "userId";
pub const FRONT_FIELD: &str = "front";
pub const BACK_FIELD: &str = "back";

/// Key used by the extended-JSON identity wrapper `{"$oid": "..."}`
const OID_KEY: &str = "$oid";

/// Wrap an id the way the document store does.
pub fn wrap_object_id(id: &str) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(OID_KEY.to_string(), Value::String(id.to_string()));
    Value::Object(wrapper)
}

/// Canonical string form of an identity value.
///
/// Accepts a plain string or an `{"$oid": "..."}` wrapper.
pub fn object_id_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) if obj.len() == 1 => obj.get(OID_KEY).and_then(Value::as_str),
        _ => None,
    }
}

/// A filter for querying records.
///
/// Matches when the record's `field` holds the same identity as `value`,
/// whether stored plain or `$oid` wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field name to filter on
    pub field: String,
    /// Identity to compare against
    pub value: String,
}

impl Filter {
    /// Create an identity filter that ignores `$oid` wrapping.
    pub fn id_eq(field: impl Into<String>, id: &str) -> Self {
        Self {
            field: field.into(),
            value: id.to_string(),
        }
    }

    /// Scope to documents owned by `owner`.
    pub fn owned_by(owner: &UserId) -> Self {
        Self::id_eq(OWNER_FIELD, owner.as_str())
    }

    /// Check if a record matches this filter.
    pub fn matches(&self, record: &Value) -> bool {
        record
            .get(&self.field)
            .and_then(object_id_str)
            .is_some_and(|have| have == self.value)
    }
}

/// Persistence boundary for flashcards.
///
/// Each operation is atomic at the single-document level: a sample never
/// observes a partially written insert.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a card owned by `owner` and return its new identity.
    async fn insert_card(&self, front: &str, back: &str, owner: &UserId) -> Result<CardId>;

    /// Pick one of `owner`'s cards uniformly at random, or `None` if they have none.
    async fn sample_one_card(&self, owner: &UserId) -> Result<Option<Document>>;

    /// Number of cards `owner` has.
    async fn count_cards(&self, owner: &UserId) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_id_str_plain_and_wrapped() {
        assert_eq!(object_id_str(&json!("abc")), Some("abc"));
        assert_eq!(object_id_str(&json!({"$oid": "abc"})), Some("abc"));
        assert_eq!(object_id_str(&wrap_object_id("def")), Some("def"));
    }

    #[test]
    fn test_object_id_str_rejects_other_shapes() {
        assert_eq!(object_id_str(&json!(42)), None);
        assert_eq!(object_id_str(&json!({"$oid": 1})), None);
        assert_eq!(object_id_str(&json!({"$oid": "a", "extra": true})), None);
        assert_eq!(object_id_str(&Value::Null), None);
    }

    #[test]
    fn test_id_eq_on_card_identity() {
        let filter = Filter::id_eq(ID_FIELD, "671140a0c3f1e2d4b5a69788");
        assert!(filter.matches(&json!({"_id": {"$oid": "671140a0c3f1e2d4b5a69788"}})));
        assert!(!filter.matches(&json!({"_id": {"$oid": "000000000000000000000000"}})));
        assert!(!filter.matches(&json!({"_id": 7})));
    }

    #[test]
    fn test_owned_by_matches_plain_and_wrapped_owner() {
        let filter = Filter::owned_by(&UserId::new("u1"));
        assert!(filter.matches(&json!({"userId": "u1"})));
        assert!(filter.matches(&json!({"userId": {"$oid": "u1"}})));
        assert!(!filter.matches(&json!({"userId": "u2"})));
        assert!(!filter.matches(&json!({"front": "no owner"})));
    }
}
