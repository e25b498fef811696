//! Server configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory holding the HTML templates
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// HTTP front-end configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory containing `search.html` and `search_results.html`
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            templates_dir: default_templates_dir(),
        }
    }
}

impl ServerConfig {
    /// Apply an optional port override
    pub fn with_port_override(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Apply an optional templates directory override
    pub fn with_templates_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.templates_dir = dir;
        }
        self
    }

    /// Listen address on all interfaces
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
