//! Connector configuration mapping

use querygate_types::ConnectorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{GatewayError, Result};

/// Key that selects which connector the factory builds
pub const TYPE_KEY: &str = "type";

/// Flat string-keyed, string-valued connector configuration
///
/// Read once when a connector is constructed. Which keys are required depends
/// on the connector; `type` is consumed by the factory, not by the connector.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorConfig {
    values: BTreeMap<String, String>,
}

impl ConnectorConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value for a key, empty or not
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for a key if present and not blank
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Value for a key that must be present and not blank
    pub fn required(&self, key: &str) -> Result<&str> {
        self.optional(key).ok_or_else(|| {
            GatewayError::configuration(format!("missing or empty required key '{}'", key))
        })
    }

    /// Check that every key in `keys` is present and non-empty.
    ///
    /// The error names the connector's full requirement and every missing key,
    /// so one failed construction reports everything that needs fixing.
    pub fn require(&self, connector: &str, keys: &[&str]) -> Result<()> {
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|key| self.optional(key).is_none())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(GatewayError::configuration(format!(
            "{} connector requires {} to be set and non-empty (missing: {})",
            connector,
            keys.join(", "),
            missing.join(", ")
        )))
    }

    /// Optional boolean flag, `default` when absent
    pub fn flag(&self, key: &str, default: bool) -> Result<bool> {
        match self.optional(key) {
            None => Ok(default),
            Some(v) => match v.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(GatewayError::configuration(format!(
                    "key '{}' must be true or false, got '{}'",
                    key, v
                ))),
            },
        }
    }

    /// Connector kind selected by the `type` key
    pub fn kind(&self) -> Result<ConnectorKind> {
        let raw = self.required(TYPE_KEY)?;
        ConnectorKind::from_str(raw).map_err(GatewayError::configuration)
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Keys whose values never appear in logs or debug output
fn is_secret(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("password") || key.contains("secret") || key.contains("token")
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if is_secret(key) {
                map.entry(key, &"***");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for ConnectorConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
