//! querygate runtime
//!
//! This crate provides the database connectors, the HTML result rendering and
//! the HTTP server that fronts a single connector.

pub mod connectors;
pub mod handlers;
pub mod render;
pub mod server;
pub mod state;

pub use connectors::{connect, Connector};
pub use server::Runtime;
pub use state::{AppState, Templates};
