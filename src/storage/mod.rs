//! Storage layer for Flashcall - the card store adapter.
//!
//! Cards live in a JSONL document collection whose records keep the shape of
//! the document store they came from (`_id` wrapped as `{"$oid": ...}`).

mod jsonl;
mod traits;

pub use jsonl::JsonlCardStore;
pub use traits::{
    BACK_FIELD, CardStore, Document, FRONT_FIELD, Filter, ID_FIELD, OWNER_FIELD, object_id_str,
    wrap_object_id,
};
