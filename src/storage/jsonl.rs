//! JSONL-backed card store with in-memory caching.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde_json::Value;

use super::traits::{BACK_FIELD, CardStore, Document, FRONT_FIELD, Filter, ID_FIELD, OWNER_FIELD, wrap_object_id};
use crate::domain::{CardId, UserId};
use crate::error::{FlashcallError, Result};
use crate::id::generate_object_id;

/// Collection holding the cards
const COLLECTION: &str = "flashcards";

fn store_err(e: impl std::fmt::Display) -> FlashcallError {
    FlashcallError::StoreUnavailable(e.to_string())
}

/// Card collection stored as one JSON document per line.
///
/// The file is the source of truth; every insert is appended while the cache
/// write lock is held, so readers see either the whole document or nothing.
pub struct JsonlCardStore {
    base_path: PathBuf,
    cache: RwLock<Option<Vec<Value>>>,
}

impl std::fmt::Debug for JsonlCardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlCardStore")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

impl JsonlCardStore {
    /// Create a store rooted at `base_path` without touching the collection file.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(store_err)?;
        Ok(Self {
            base_path,
            cache: RwLock::new(None),
        })
    }

    /// Create a store and load the collection immediately, failing on corrupt data.
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(base_path)?;
        store.ensure_loaded()?;
        log::info!("Opened card store at {}", store.collection_path().display());
        Ok(store)
    }

    /// Path of the collection file.
    pub fn collection_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", COLLECTION))
    }

    /// Load the collection into cache if not already loaded.
    fn ensure_loaded(&self) -> Result<()> {
        {
            let cache = self.cache.read().map_err(store_err)?;
            if cache.is_some() {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().map_err(store_err)?;
        if cache.is_some() {
            return Ok(());
        }

        *cache = Some(self.read_file()?);
        Ok(())
    }

    fn read_file(&self) -> Result<Vec<Value>> {
        let path = self.collection_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path).map_err(store_err)?);
        let mut records = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.map_err(store_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Value = serde_json::from_str(&line).map_err(|e| {
                FlashcallError::StoreUnavailable(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Append a record to the JSONL file.
    fn append_to_file(&self, record: &Value) -> Result<()> {
        let line = serde_json::to_string(record).map_err(store_err)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path())
            .map_err(store_err)?;
        writeln!(file, "{}", line).map_err(store_err)?;
        Ok(())
    }

    /// Documents matching every filter.
    fn query(&self, filters: &[Filter]) -> Result<Vec<Value>> {
        self.ensure_loaded()?;
        let cache = self.cache.read().map_err(store_err)?;
        let records = cache
            .as_ref()
            .ok_or_else(|| store_err(format!("Collection not loaded: {}", COLLECTION)))?;

        Ok(records
            .iter()
            .filter(|r| filters.iter().all(|f| f.matches(r)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CardStore for JsonlCardStore {
    async fn insert_card(&self, front: &str, back: &str, owner: &UserId) -> Result<CardId> {
        self.ensure_loaded()?;

        let id = generate_object_id();
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), wrap_object_id(&id));
        doc.insert(FRONT_FIELD.to_string(), Value::String(front.to_string()));
        doc.insert(BACK_FIELD.to_string(), Value::String(back.to_string()));
        doc.insert(OWNER_FIELD.to_string(), Value::String(owner.as_str().to_string()));
        let value = Value::Object(doc);

        let mut cache = self.cache.write().map_err(store_err)?;
        let records = cache
            .as_mut()
            .ok_or_else(|| store_err(format!("Collection not loaded: {}", COLLECTION)))?;

        // Append to file first (source of truth), then update cache
        self.append_to_file(&value)?;
        records.push(value);

        log::debug!("Inserted card {} for owner {}", id, owner);
        Ok(CardId::new(id))
    }

    async fn sample_one_card(&self, owner: &UserId) -> Result<Option<Document>> {
        let candidates = self.query(&[Filter::owned_by(owner)])?;
        let picked = candidates.choose(&mut rand::rng()).cloned();

        match picked {
            Some(Value::Object(doc)) => Ok(Some(doc)),
            Some(other) => Err(store_err(format!("Card document is not an object: {}", other))),
            None => Ok(None),
        }
    }

    async fn count_cards(&self, owner: &UserId) -> Result<usize> {
        Ok(self.query(&[Filter::owned_by(owner)])?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::object_id_str;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonlCardStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlCardStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_insert_then_sample() {
        let (store, _temp) = create_test_store();
        let owner = UserId::new("u1");

        let id = store.insert_card("Hola", "Hello", &owner).await.unwrap();
        let doc = store.sample_one_card(&owner).await.unwrap().unwrap();

        assert_eq!(object_id_str(&doc[ID_FIELD]), Some(id.as_str()));
        assert_eq!(doc[FRONT_FIELD], "Hola");
        assert_eq!(doc[BACK_FIELD], "Hello");
        assert_eq!(doc[OWNER_FIELD], "u1");
    }

    #[tokio::test]
    async fn test_stored_id_is_wrapped() {
        let (store, _temp) = create_test_store();
        let owner = UserId::new("u1");
        store.insert_card("a", "b", &owner).await.unwrap();

        let doc = store.sample_one_card(&owner).await.unwrap().unwrap();
        assert!(doc[ID_FIELD].is_object());
        assert!(doc[ID_FIELD]["$oid"].is_string());
    }

    #[tokio::test]
    async fn test_sample_empty_is_none() {
        let (store, _temp) = create_test_store();
        let sampled = store.sample_one_card(&UserId::new("nobody")).await.unwrap();
        assert!(sampled.is_none());
    }

    #[tokio::test]
    async fn test_sample_is_scoped_to_owner() {
        let (store, _temp) = create_test_store();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        store.insert_card("alice card", "A", &alice).await.unwrap();
        for _ in 0..20 {
            let doc = store.sample_one_card(&bob).await.unwrap();
            assert!(doc.is_none());
        }

        store.insert_card("bob card", "B", &bob).await.unwrap();
        for _ in 0..20 {
            let doc = store.sample_one_card(&bob).await.unwrap().unwrap();
            assert_eq!(doc[OWNER_FIELD], "bob");
        }
    }

    #[tokio::test]
    async fn test_sample_eventually_covers_all_cards() {
        let (store, _temp) = create_test_store();
        let owner = UserId::new("u1");
        for front in ["one", "two", "three"] {
            store.insert_card(front, "x", &owner).await.unwrap();
        }

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let doc = store.sample_one_card(&owner).await.unwrap().unwrap();
            seen.insert(doc[FRONT_FIELD].as_str().unwrap().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn test_count_cards() {
        let (store, _temp) = create_test_store();
        let owner = UserId::new("u1");
        assert_eq!(store.count_cards(&owner).await.unwrap(), 0);

        store.insert_card("a", "b", &owner).await.unwrap();
        store.insert_card("c", "d", &owner).await.unwrap();
        store.insert_card("e", "f", &UserId::new("u2")).await.unwrap();

        assert_eq!(store.count_cards(&owner).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let owner = UserId::new("u1");

        let id = {
            let store = JsonlCardStore::open(temp_dir.path()).unwrap();
            store.insert_card("persisted", "yes", &owner).await.unwrap()
        };

        let store = JsonlCardStore::open(temp_dir.path()).unwrap();
        let doc = store.sample_one_card(&owner).await.unwrap().unwrap();
        assert_eq!(object_id_str(&doc[ID_FIELD]), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_seeded_documents_with_wrapped_owner() {
        let temp_dir = TempDir::new().unwrap();
        let line = r#"{"_id":{"$oid":"650000000000000000000001"},"front":"Seeded","back":"Card","userId":{"$oid":"650000000000000000000abc"}}"#;
        fs::write(temp_dir.path().join("flashcards.jsonl"), format!("{}\n\n", line)).unwrap();

        let store = JsonlCardStore::open(temp_dir.path()).unwrap();
        let owner = UserId::new("650000000000000000000abc");
        let doc = store.sample_one_card(&owner).await.unwrap().unwrap();
        assert_eq!(doc[FRONT_FIELD], "Seeded");
    }

    #[test]
    fn test_corrupt_line_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("flashcards.jsonl"), "{\"front\":\"ok\"}\nnot json\n").unwrap();

        let err = JsonlCardStore::open(temp_dir.path()).unwrap_err();
        assert!(matches!(err, FlashcallError::StoreUnavailable(_)));
        assert!(err.to_string().contains(":2:"));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_are_all_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(JsonlCardStore::open(temp_dir.path()).unwrap());
        let owner = UserId::new("u1");

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let owner = owner.clone();
            handles.push(tokio::spawn(async move {
                store.insert_card(&format!("front {}", i), "back", &owner).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reopened = JsonlCardStore::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.count_cards(&owner).await.unwrap(), 16);
    }
}
