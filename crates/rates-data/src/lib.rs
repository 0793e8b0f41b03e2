//! Quote snapshot loaders.
//!
//! Builds a dependency map from a file so rules can be evaluated offline.

mod csv_source;
mod json_source;

pub use csv_source::CsvQuoteSource;
pub use json_source::load_json;

use std::path::Path;
use rates_core::error::DataError;
use rates_core::types::DependencyMap;

/// Load a quote snapshot, choosing the format from the file extension.
///
/// `.json` files are read as a `"SOURCE_INSTRUMENT" -> {bid, ask}` object;
/// anything else is read as CSV.
pub fn load_quotes(path: &Path) -> Result<DependencyMap, DataError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => CsvQuoteSource::new(path)?.load(),
    }
}
