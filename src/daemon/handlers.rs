//! Request handlers for the daemon
//!
//! - assistant.send: one assist request per call
//! - ping: liveness, version and model

use serde_json::{Value, json};

use super::context::DaemonContext;
use crate::domain::UserId;
use crate::ipc::messages::{DaemonError, DaemonResponse};

/// Handle assistant.send - route one message and return the reply envelope
pub async fn handle_assistant_send(id: u64, params: &Value, ctx: &DaemonContext) -> DaemonResponse {
    let user = match params["userId"].as_str() {
        Some(u) if !u.trim().is_empty() => UserId::new(u.trim()),
        _ => return DaemonResponse::error(id, DaemonError::invalid_params("Missing 'userId' parameter")),
    };
    let message = match params["message"].as_str() {
        Some(m) if !m.trim().is_empty() => m,
        _ => return DaemonResponse::error(id, DaemonError::invalid_params("Missing 'message' parameter")),
    };

    match ctx.assistant.assist(&user, message).await {
        Ok(reply) => match serde_json::to_value(&reply) {
            Ok(value) => DaemonResponse::success(id, value),
            Err(e) => DaemonResponse::error(id, DaemonError::internal_error(e.to_string())),
        },
        Err(e) => {
            log::warn!("assistant.send failed for {}: {}", user, e);
            DaemonResponse::error(id, DaemonError::from(&e))
        }
    }
}

/// Handle ping
pub fn handle_ping(id: u64, ctx: &DaemonContext) -> DaemonResponse {
    DaemonResponse::success(
        id,
        json!({
            "pong": true,
            "version": env!("CARGO_PKG_VERSION"),
            "model": ctx.assistant.model(),
            "ready": ctx.assistant.is_ready(),
        }),
    )
}
