//! JSON and YAML connector configuration formats

use querygate_core::{ConnectorConfig, GatewayError};
use serde_json::Value;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }

    /// Parse a document into a flat connector configuration.
    ///
    /// The document must be a single mapping. Numbers and booleans are
    /// accepted and stringified; nulls, lists and nested mappings are rejected.
    pub fn parse(&self, content: &str) -> Result<ConnectorConfig, GatewayError> {
        let document: Value = match self {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                GatewayError::configuration(format!("JSON parse error: {}", e))
            })?,
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                GatewayError::configuration(format!("YAML parse error: {}", e))
            })?,
        };

        let Value::Object(entries) = document else {
            return Err(GatewayError::configuration(
                "connector configuration must be a flat mapping of keys to values",
            ));
        };

        entries
            .into_iter()
            .map(|(key, value)| -> Result<(String, String), GatewayError> {
                let value = scalar_to_string(&key, value)?;
                Ok((key, value))
            })
            .collect()
    }
}

fn scalar_to_string(key: &str, value: Value) -> Result<String, GatewayError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(GatewayError::configuration(format!(
            "key '{}' has no value",
            key
        ))),
        Value::Array(_) | Value::Object(_) => Err(GatewayError::configuration(format!(
            "key '{}' must be a string, number or boolean",
            key
        ))),
    }
}
