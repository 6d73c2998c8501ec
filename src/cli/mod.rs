//! CLI module for toolsync - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for syncing, pulling,
//! icon upload, and config introspection.

pub mod commands;

pub use commands::Cli;
