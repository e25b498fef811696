//! Domain models for querygate configuration

mod config;
mod types;

pub use config::{ConnectorConfig, TYPE_KEY};
pub use types::{ServerConfig, DEFAULT_PORT, DEFAULT_TEMPLATES_DIR};
