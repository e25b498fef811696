//! Configuration loading for querygate
//!
//! This crate reads a flat connector configuration from a JSON or YAML file,
//! substitutes `{{ env.VAR }}` placeholders, and picks the active file out of
//! a configuration directory.

pub mod discover;
pub mod env;
pub mod format;

pub use discover::find_config;
pub use env::EnvSubstitutor;
pub use format::ConfigFormat;

use querygate_core::{ConnectorConfig, GatewayError};
use std::path::Path;
use tracing::debug;

/// Parse a connector configuration file, choosing the format by extension
pub fn parse_file(path: impl AsRef<Path>) -> Result<ConnectorConfig, GatewayError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        GatewayError::configuration(format!("Failed to read file '{}': {}", path.display(), e))
    })?;

    debug!("Parsing connector configuration from {}", path.display());
    parse_string(&content, ConfigFormat::from_path(path))
}

/// Parse a connector configuration from a string
pub fn parse_string(content: &str, format: ConfigFormat) -> Result<ConnectorConfig, GatewayError> {
    let config = format.parse(content)?;

    // Substitute environment placeholders value by value so substituted text
    // never has to be valid JSON or YAML.
    let substitutor = EnvSubstitutor::new();
    config
        .iter()
        .map(|(key, value)| -> Result<(String, String), GatewayError> {
            Ok((key.to_string(), substitutor.substitute(value)?))
        })
        .collect()
}

/// Load the active configuration from a directory of candidates
pub fn load_dir(dir: impl AsRef<Path>) -> Result<ConnectorConfig, GatewayError> {
    let path = find_config(dir)?;
    parse_file(path)
}
