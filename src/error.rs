//! Error types for Flashcall
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Flashcall
#[derive(Debug, Error)]
pub enum FlashcallError {
    /// The completion call failed, timed out, or returned an unusable body
    #[error("Generation service unavailable: {0}")]
    GenerationServiceUnavailable(String),

    /// The generation service proposed an unknown tool or left out a required argument
    #[error("Malformed tool invocation: {0}")]
    MalformedToolInvocation(String),

    /// The card store failed after a valid invocation was dispatched
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration could not be loaded or is incomplete
    #[error("Config error: {0}")]
    Config(String),

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlashcallError {
    /// True for the three failures that terminate an assist request.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            FlashcallError::GenerationServiceUnavailable(_)
                | FlashcallError::MalformedToolInvocation(_)
                | FlashcallError::StoreUnavailable(_)
        )
    }
}

/// Result type alias for Flashcall operations
pub type Result<T> = std::result::Result<T, FlashcallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_unavailable_error() {
        let err = FlashcallError::GenerationServiceUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Generation service unavailable: connection refused");
    }

    #[test]
    fn test_malformed_invocation_error() {
        let err = FlashcallError::MalformedToolInvocation("unknown tool: deleteAllTool".to_string());
        assert_eq!(err.to_string(), "Malformed tool invocation: unknown tool: deleteAllTool");
    }

    #[test]
    fn test_store_unavailable_error() {
        let err = FlashcallError::StoreUnavailable("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Store unavailable: lock poisoned");
    }

    #[test]
    fn test_request_failure_classification() {
        assert!(FlashcallError::GenerationServiceUnavailable("x".into()).is_request_failure());
        assert!(FlashcallError::MalformedToolInvocation("x".into()).is_request_failure());
        assert!(FlashcallError::StoreUnavailable("x".into()).is_request_failure());
        assert!(!FlashcallError::Config("x".into()).is_request_failure());
        assert!(!FlashcallError::Ipc("x".into()).is_request_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FlashcallError = io_err.into();
        assert!(matches!(err, FlashcallError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: FlashcallError = json_err.into();
        assert!(matches!(err, FlashcallError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(FlashcallError::StoreUnavailable("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
