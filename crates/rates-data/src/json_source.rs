//! JSON quote snapshots.

use std::path::Path;
use tracing::info;

use rates_core::error::DataError;
use rates_core::types::DependencyMap;

/// Load a `{"PF1_EURUSD": {"bid": .., "ask": ..}}` object.
pub fn load_json(path: &Path) -> Result<DependencyMap, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let deps = parse_json(&raw)?;
    info!(path = %path.display(), quotes = deps.len(), "Loaded quote snapshot");
    Ok(deps)
}

pub(crate) fn parse_json(raw: &str) -> Result<DependencyMap, DataError> {
    serde_json::from_str(raw).map_err(|e| DataError::Parse(e.to_string()))
}
