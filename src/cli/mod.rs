//! CLI module for flashcall - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for one-shot questions,
//! the IPC daemon, and card counts.

pub mod commands;

pub use commands::Cli;
