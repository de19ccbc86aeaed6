//! Daemon - serves the assistant over the IPC socket
//!
//! The daemon is the long-running process that:
//! - Accepts client connections on a Unix socket
//! - Answers assistant.send and ping requests
//! - Stops on Ctrl-C and removes its socket

pub mod context;
pub mod handlers;

use std::sync::Arc;

pub use context::DaemonContext;

use crate::assistant::Assistant;
use crate::config::DaemonConfig;
use crate::error::Result;
use crate::ipc::{IpcServer, IpcServerConfig};

/// Run the daemon in the foreground until Ctrl-C
pub async fn run_daemon(config: &DaemonConfig, assistant: Arc<Assistant>) -> Result<()> {
    let server = Arc::new(IpcServer::with_config(IpcServerConfig::from(config)));
    let ctx = Arc::new(DaemonContext::new(assistant));

    let signal_server = Arc::clone(&server);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received Ctrl-C, shutting down");
                signal_server.shutdown();
            }
            Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    server.run(ctx).await
}
