//! CSV loading with encoding fallback.
//!
//! Files are decoded as UTF-8 first, falling back to Latin-1 when the bytes
//! are not valid UTF-8, mirroring how business exports from older tools tend
//! to arrive.

use std::borrow::Cow;
use std::path::Path;

use tracing::info;

use crate::error::{DatasetError, Result};

use super::column::Column;
use super::table::Dataset;

/// Load a CSV file into a [`Dataset`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(DatasetError::ReadFile)?;
    let dataset = Dataset::from_csv_bytes(&bytes)?;
    info!(
        "Loaded CSV dataset from {}: {} rows, {} columns",
        path.display(),
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

impl Dataset {
    /// Parse CSV bytes into a dataset, inferring column kinds.
    ///
    /// Empty fields become nulls. A file with no data rows is an error.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let text = decode(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(DatasetError::Csv)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(DatasetError::Empty.into());
        }

        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record.map_err(DatasetError::Csv)?;
            for (i, raw) in raw_columns.iter_mut().enumerate() {
                let value = record.get(i).map(str::trim).unwrap_or_default();
                raw.push(if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                });
            }
        }

        if raw_columns.iter().all(|c| c.is_empty()) {
            return Err(DatasetError::Empty.into());
        }

        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column::from_raw(name, raw))
            .collect();
        Dataset::new(columns)
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => encoding_rs::mem::decode_latin1(bytes),
    }
}
