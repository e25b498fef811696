//! Configuration directory discovery

use querygate_core::GatewayError;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name marker for sample configurations that are never loaded
pub const EXAMPLE_MARKER: &str = "example_";

/// Find the active configuration file in `dir`.
///
/// Every regular file whose name does not contain `example_` is a candidate.
/// Candidates are taken in sorted order and the last one wins; the others are
/// reported at warn level.
pub fn find_config(dir: impl AsRef<Path>) -> Result<PathBuf, GatewayError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| {
        GatewayError::configuration(format!(
            "Failed to read config directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().contains(EXAMPLE_MARKER) {
            continue;
        }
        candidates.push(entry.path());
    }
    candidates.sort();

    let chosen = candidates.pop().ok_or_else(|| {
        GatewayError::configuration(format!(
            "No connector configuration found in '{}' (files containing '{}' are ignored)",
            dir.display(),
            EXAMPLE_MARKER
        ))
    })?;

    for ignored in &candidates {
        warn!(
            "Ignoring config file {} in favour of {}",
            ignored.display(),
            chosen.display()
        );
    }

    Ok(chosen)
}
