//! IPC Layer - Unix socket server for the assistant daemon
//!
//! This module provides:
//! - Message types for requests and responses
//! - Unix socket server with a pluggable request handler

pub mod messages;
pub mod server;

pub use messages::{DaemonError, DaemonRequest, DaemonResponse, ErrorCode, Methods};
pub use server::{IpcServer, IpcServerConfig, RequestHandler};
