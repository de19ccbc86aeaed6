//! Daemon context - shared state for request handlers
//!
//! DaemonContext owns the assistant pipeline and routes IPC methods to their
//! handlers. It holds no per-request state.

use std::sync::Arc;

use super::handlers::{handle_assistant_send, handle_ping};
use crate::assistant::Assistant;
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse, Methods};
use crate::ipc::server::RequestHandler;

/// Shared context for all daemon request handlers
pub struct DaemonContext {
    pub assistant: Arc<Assistant>,
}

impl DaemonContext {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }
}

impl RequestHandler for DaemonContext {
    fn handle(&self, request: DaemonRequest) -> impl std::future::Future<Output = DaemonResponse> + Send {
        async move {
            log::debug!("Handling {} (id {})", request.method, request.id);
            match request.method.as_str() {
                Methods::ASSISTANT_SEND => handle_assistant_send(request.id, &request.params, self).await,
                Methods::PING => handle_ping(request.id, self),
                other => DaemonResponse::error(request.id, DaemonError::method_not_found(other)),
            }
        }
    }
}
