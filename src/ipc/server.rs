//! IPC Server - Unix socket server for the assistant daemon
//!
//! Provides:
//! - Unix stream socket listener
//! - Client connection handling, capped at `max_clients`
//! - Request routing and response sending

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;

use crate::config::DaemonConfig;
use crate::error::{FlashcallError, Result};
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse};

/// Configuration for the IPC server
#[derive(Debug, Clone)]
pub struct IpcServerConfig {
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Maximum number of concurrent clients
    pub max_clients: usize,
}

impl Default for IpcServerConfig {
    fn default() -> Self {
        Self::from(&DaemonConfig::default())
    }
}

impl From<&DaemonConfig> for IpcServerConfig {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            socket_path: config.socket_path.clone(),
            max_clients: config.max_clients,
        }
    }
}

/// Handler trait for processing requests
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    fn handle(&self, request: DaemonRequest) -> impl std::future::Future<Output = DaemonResponse> + Send;
}

/// IPC Server for daemon communication
pub struct IpcServer {
    config: IpcServerConfig,
    /// Connected clients
    clients: Arc<AtomicUsize>,
    /// Next client ID
    next_client_id: AtomicU64,
    /// Shutdown signal
    shutdown_tx: watch::Sender<bool>,
}

impl IpcServer {
    /// Create a new IPC server with custom config
    pub fn with_config(config: IpcServerConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            clients: Arc::new(AtomicUsize::new(0)),
            next_client_id: AtomicU64::new(1),
            shutdown_tx,
        }
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Get count of connected clients
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::SeqCst)
    }

    /// Run the server with a request handler until [`IpcServer::shutdown`] is called
    pub async fn run<H: RequestHandler + 'static>(&self, handler: Arc<H>) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        // Remove existing socket if present
        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path)?;
        }

        // Ensure parent directory exists
        if let Some(parent) = self.config.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.config.socket_path)
            .map_err(|e| FlashcallError::Ipc(format!("Failed to bind socket: {}", e)))?;
        log::info!("Listening on {}", self.config.socket_path.display());

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            if self.client_count() >= self.config.max_clients {
                                log::warn!("Rejecting connection: {} clients connected", self.config.max_clients);
                                tokio::spawn(reject_client(stream, self.config.max_clients));
                                continue;
                            }

                            let client_id = self.next_client_id.fetch_add(1, Ordering::SeqCst);
                            self.clients.fetch_add(1, Ordering::SeqCst);
                            log::debug!("Client {} connected", client_id);

                            let handler = Arc::clone(&handler);
                            let clients = Arc::clone(&self.clients);

                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, handler).await {
                                    log::warn!("Client {} error: {}", client_id, e);
                                }
                                clients.fetch_sub(1, Ordering::SeqCst);
                                log::debug!("Client {} disconnected", client_id);
                            });
                        }
                        Err(e) => {
                            log::error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    break;
                }
            }
        }

        // Cleanup socket
        let _ = std::fs::remove_file(&self.config.socket_path);
        log::info!("IPC server stopped");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Tell a client over the limit that the daemon is busy, then close.
async fn reject_client(mut stream: UnixStream, max_clients: usize) {
    let response = DaemonResponse::error(
        0,
        DaemonError::internal_error(format!("Server busy: {} clients connected", max_clients)),
    );
    let line = match serde_json::to_string(&response) {
        Ok(json) => json + "\n",
        Err(e) => {
            log::error!("Failed to encode busy response: {}", e);
            return;
        }
    };
    if let Err(e) = stream.write_all(line.as_bytes()).await {
        log::debug!("Busy response not delivered: {}", e);
    }
    let _ = stream.shutdown().await;
}

/// Handle a single client connection.
///
/// Requests on one connection are answered in order; separate connections run
/// concurrently.
async fn handle_client<H: RequestHandler>(stream: UnixStream, handler: Arc<H>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break; // EOF - client disconnected
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<DaemonRequest>(trimmed) {
            Ok(request) => handler.handle(request).await,
            Err(e) => DaemonResponse::error(0, DaemonError::parse_error(format!("Parse error: {}", e))),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
    }

    Ok(())
}
