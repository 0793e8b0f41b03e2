//! CSV quote snapshots.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use rates_core::error::DataError;
use rates_core::types::{DependencyMap, Instrument, Quote, QuoteKey, SourceId};

/// CSV record format.
///
/// Either a composite `key` column (`PF1_EURUSD`) or separate `source` and
/// `instrument` columns identify the quote.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Key", default)]
    key: Option<String>,
    #[serde(alias = "Source", alias = "platform", alias = "Platform", default)]
    source: Option<String>,
    #[serde(alias = "Instrument", alias = "rate", alias = "Rate", alias = "symbol", default)]
    instrument: Option<String>,
    #[serde(alias = "Bid")]
    bid: f64,
    #[serde(alias = "Ask")]
    ask: f64,
    #[serde(alias = "Timestamp", alias = "time", alias = "date", default)]
    timestamp: Option<String>,
}

/// CSV file holding one quote per row.
pub struct CsvQuoteSource {
    path: PathBuf,
}

impl CsvQuoteSource {
    /// Create a new CSV quote source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load every row into a dependency map.
    pub fn load(&self) -> Result<DependencyMap, DataError> {
        let file = std::fs::File::open(&self.path)?;
        let deps = Self::load_from_reader(file)?;
        info!(path = %self.path.display(), quotes = deps.len(), "Loaded quote snapshot");
        Ok(deps)
    }

    /// Load quotes from any CSV reader.
    ///
    /// When a key repeats, the row with the later timestamp wins. Repeats
    /// without timestamps, or with equal ones, are rejected.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<DependencyMap, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut latest: HashMap<QuoteKey, (Quote, Option<i64>)> = HashMap::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;

            let key = Self::parse_key(&record)?;
            let quote = Quote::new(record.bid, record.ask);
            let timestamp = match record.timestamp.as_deref() {
                Some(ts) if !ts.is_empty() => Some(Self::parse_timestamp(ts)?),
                _ => None,
            };

            let previous = latest.get(&key).map(|(_, ts)| *ts);
            match previous {
                None => {
                    latest.insert(key, (quote, timestamp));
                }
                Some(previous) => match (previous, timestamp) {
                    (Some(prev), Some(ts)) if ts > prev => {
                        debug!(key = %key, "Replacing quote with newer row");
                        latest.insert(key, (quote, timestamp));
                    }
                    (Some(prev), Some(ts)) if ts < prev => {
                        debug!(key = %key, "Ignoring older row");
                    }
                    _ => return Err(DataError::DuplicateKey(key)),
                },
            }
        }

        Ok(latest
            .into_iter()
            .map(|(key, (quote, _))| (key, quote))
            .collect())
    }

    fn parse_key(record: &CsvRecord) -> Result<QuoteKey, DataError> {
        match (&record.key, &record.source, &record.instrument) {
            (Some(key), _, _) if !key.is_empty() => Ok(key.parse::<QuoteKey>()?),
            (_, Some(source), Some(instrument)) => Ok(QuoteKey::new(
                SourceId::new(source.as_str())?,
                Instrument::new(instrument.as_str())?,
            )),
            _ => Err(DataError::Parse(
                "row needs either a key column or source and instrument columns".to_string(),
            )),
        }
    }

    /// Parse various timestamp formats into Unix milliseconds.
    fn parse_timestamp(value: &str) -> Result<i64, DataError> {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
            return Ok(dt.timestamp_millis());
        }

        let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"];

        for format in formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(dt.and_utc().timestamp_millis());
            }
            if let Ok(d) = NaiveDate::parse_from_str(value, format) {
                if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                    return Ok(dt.and_utc().timestamp_millis());
                }
            }
        }

        // Unix timestamp; assume milliseconds if > 10 digits
        if let Ok(ts) = value.parse::<i64>() {
            if ts > 10_000_000_000 {
                return Ok(ts);
            } else {
                return Ok(ts * 1000);
            }
        }

        Err(DataError::Parse(format!("Could not parse timestamp: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> QuoteKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(CsvQuoteSource::parse_timestamp("2024-01-15").is_ok());
        assert!(CsvQuoteSource::parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(CsvQuoteSource::parse_timestamp("2024-01-15T10:30:00.250").is_ok());
        assert!(CsvQuoteSource::parse_timestamp("2024-01-15T10:30:00Z").is_ok());
        assert_eq!(
            CsvQuoteSource::parse_timestamp("1705312800000").unwrap(),
            CsvQuoteSource::parse_timestamp("1705312800").unwrap()
        );
        assert!(CsvQuoteSource::parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_source_and_instrument_columns() {
        let data = "source,instrument,bid,ask\nPF1,USDTRY,32.10,32.12\nPF2,USDTRY,32.12,32.14\n";
        let deps = CsvQuoteSource::load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(deps.len(), 2);
        assert_eq!(deps.get(&key("PF2_USDTRY")), Some(&Quote::new(32.12, 32.14)));
    }

    #[test]
    fn test_load_key_column() {
        let data = "key,bid,ask\nPF1_EURUSD,1.0800,1.0802\n";
        let deps = CsvQuoteSource::load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(deps.get(&key("PF1_EURUSD")), Some(&Quote::new(1.0800, 1.0802)));
    }

    #[test]
    fn test_newer_row_wins() {
        let data = "source,instrument,bid,ask,timestamp\n\
                    PF1,USDTRY,32.10,32.12,2024-01-15 10:30:01\n\
                    PF1,USDTRY,32.20,32.22,2024-01-15 10:30:02\n\
                    PF1,USDTRY,32.00,32.02,2024-01-15 10:30:00\n";
        let deps = CsvQuoteSource::load_from_reader(data.as_bytes()).unwrap();

        assert_eq!(deps.len(), 1);
        assert_eq!(deps.get(&key("PF1_USDTRY")), Some(&Quote::new(32.20, 32.22)));
    }

    #[test]
    fn test_duplicate_without_timestamps_rejected() {
        let data = "key,bid,ask\nPF1_USDTRY,32.10,32.12\nPF1_USDTRY,32.20,32.22\n";
        let err = CsvQuoteSource::load_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(err, DataError::DuplicateKey(k) if k == key("PF1_USDTRY")));
    }

    #[test]
    fn test_bad_instrument_rejected() {
        let data = "source,instrument,bid,ask\nPF1,USD/TRY,32.10,32.12\n";
        let err = CsvQuoteSource::load_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(err, DataError::Key(_)));
    }

    #[test]
    fn test_missing_identity_columns_rejected() {
        let data = "bid,ask\n32.10,32.12\n";
        assert!(matches!(
            CsvQuoteSource::load_from_reader(data.as_bytes()),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvQuoteSource::new("/nonexistent/quotes.csv"),
            Err(DataError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.csv");
        std::fs::write(
            &path,
            "source,instrument,bid,ask\nPF1,GBPUSD,1.2650,1.2652\nPF2,GBPUSD,1.2652,1.2654\n",
        )
        .unwrap();

        let deps = CsvQuoteSource::new(&path).unwrap().load().unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.get(&key("PF1_GBPUSD")), Some(&Quote::new(1.2650, 1.2652)));
    }
}
