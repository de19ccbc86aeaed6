//! ID generation utilities for Flashcall
//!
//! Card documents get ObjectId-shaped identifiers so the stored collection looks
//! like the document store it replaces.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a document ID
///
/// Format: 4-byte big-endian seconds timestamp followed by 8 random bytes,
/// hex encoded (24 chars).
/// Example: `671140a0c3f1e2d4b5a69788`
pub fn generate_object_id() -> String {
    let seconds = (now_ms() / 1000) as u32;
    let mut tail = [0u8; 8];
    rand::rng().fill(&mut tail);

    let mut bytes = Vec::with_capacity(12);
    bytes.extend_from_slice(&seconds.to_be_bytes());
    bytes.extend_from_slice(&tail);
    hex::encode(bytes)
}
