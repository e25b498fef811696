//! querygate CLI
//!
//! This crate provides the command-line interface for querygate including:
//! - run: Start the HTTP server in front of the configured connector
//! - query: Run a read statement and print the result
//! - execute: Run a mutating statement and print the affected-row count
//! - init: Scaffold a configuration directory and the HTML templates

pub mod commands;

pub use commands::{Cli, Commands};
