//! Domain types for Flashcall
//!
//! - Card: the public, storage-independent card shape
//! - CardId / UserId: opaque identities

pub mod card;

pub use card::{Card, CardId, UserId};
