//! Shared runtime application state (HTTP handlers)

use querygate_core::GatewayError;
use std::path::Path;
use std::sync::Arc;

use crate::connectors::Connector;

/// File name of the search page template
pub const SEARCH_TEMPLATE: &str = "search.html";

/// File name of the results fragment template
pub const RESULTS_TEMPLATE: &str = "search_results.html";

/// HTML templates, read once at startup
#[derive(Debug, Clone)]
pub struct Templates {
    pub search: String,
    pub search_results: String,
}

impl Templates {
    /// Read both templates from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|e| {
                GatewayError::Template(format!("Failed to read {}: {}", path.display(), e))
            })
        };

        Ok(Self {
            search: read(SEARCH_TEMPLATE)?,
            search_results: read(RESULTS_TEMPLATE)?,
        })
    }

    pub fn from_strings(search: impl Into<String>, search_results: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            search_results: search_results.into(),
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn Connector>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(connector: Arc<dyn Connector>, templates: Templates) -> Self {
        Self {
            connector,
            templates: Arc::new(templates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SEARCH_TEMPLATE), "<form></form>").unwrap();
        std::fs::write(dir.path().join(RESULTS_TEMPLATE), "$THS|$TRS").unwrap();

        let templates = Templates::load(dir.path()).unwrap();
        assert_eq!(templates.search, "<form></form>");
        assert_eq!(templates.search_results, "$THS|$TRS");
    }

    #[test]
    fn test_templates_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SEARCH_TEMPLATE), "<form></form>").unwrap();

        let err = Templates::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(RESULTS_TEMPLATE));
    }
}
