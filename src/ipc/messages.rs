//! IPC message types for client ↔ daemon communication.
//!
//! Uses JSON Lines (newline-delimited JSON) over Unix stream socket.
//! Message schema uses familiar field names (id, method, params, result, error)
//! but does NOT implement JSON-RPC 2.0 specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FlashcallError;

/// Request sent from a client to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g., "assistant.send", "ping").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl DaemonRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn no_params(id: u64, method: impl Into<String>) -> Self {
        Self::new(id, method, Value::Object(Default::default()))
    }
}

/// Response sent from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DaemonError>,
}

impl DaemonResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: DaemonError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a daemon response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonError {
    /// Error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DaemonError {
    /// Create a new error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method.into()),
        )
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }
}

/// Maps a failure to its code and a fixed message. The detail stays in the daemon log.
impl From<&FlashcallError> for DaemonError {
    fn from(err: &FlashcallError) -> Self {
        match err {
            FlashcallError::GenerationServiceUnavailable(_) => {
                Self::new(ErrorCode::GENERATION_UNAVAILABLE, "Generation service unavailable")
            }
            FlashcallError::MalformedToolInvocation(_) => {
                Self::new(ErrorCode::MALFORMED_INVOCATION, "Malformed tool invocation")
            }
            FlashcallError::StoreUnavailable(_) => Self::new(ErrorCode::STORE_UNAVAILABLE, "Store unavailable"),
            _ => Self::internal_error("Internal error"),
        }
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal daemon error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Generation service failed or timed out.
    pub const GENERATION_UNAVAILABLE: i32 = 2001;
    /// Generation service proposed a tool call outside the catalog.
    pub const MALFORMED_INVOCATION: i32 = 2002;
    /// Card store failed.
    pub const STORE_UNAVAILABLE: i32 = 2003;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const PING: &'static str = "ping";
    pub const ASSISTANT_SEND: &'static str = "assistant.send";
}
