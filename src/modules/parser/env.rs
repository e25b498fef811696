//! Environment variable substitution

use querygate_core::GatewayError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex pattern for environment variable placeholders: {{ env.VAR_NAME }}
static ENV_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap()
});

/// Environment variable substitutor for configuration values
///
/// Every referenced variable must be set; the error lists all missing names.
#[derive(Debug, Default)]
pub struct EnvSubstitutor;

impl EnvSubstitutor {
    pub fn new() -> Self {
        Self
    }

    /// Substitute environment variables in the given value
    pub fn substitute(&self, content: &str) -> Result<String, GatewayError> {
        if !Self::has_placeholders(content) {
            return Ok(content.to_string());
        }

        // Load .env file if present (ignores errors)
        let _ = dotenvy::dotenv();

        let mut missing: Vec<String> = Vec::new();
        let result = ENV_PATTERN.replace_all(content, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.push(var_name.to_string());
                    cap[0].to_string()
                }
            }
        });

        if !missing.is_empty() {
            return Err(GatewayError::EnvVarNotFound(missing.join(", ")));
        }

        Ok(result.into_owned())
    }

    /// Check if a string contains environment variable placeholders
    pub fn has_placeholders(content: &str) -> bool {
        ENV_PATTERN.is_match(content)
    }
}
