//! The in-memory dataset: ordered named columns over a fixed row count.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DatasetError, Result};

use super::column::{Column, ColumnKind};

/// An ordered collection of named columns with equal lengths.
///
/// The dataset is owned by the caller; the resolution engine only reads it,
/// except for the explicit [`normalize_temporal`](Dataset::normalize_temporal)
/// step, which is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from columns, validating equal lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for col in &columns {
            if col.len() != rows {
                return Err(DatasetError::LengthMismatch {
                    expected: rows,
                    got: col.len(),
                }
                .into());
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// True when every named column is present.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.column(n).is_some())
    }

    /// Parse a string column into dates in place.
    ///
    /// Entries that fail to parse become null and are excluded when the
    /// column is later grouped. Idempotent: an already-temporal column and
    /// an absent column are both no-ops. Returns the number of entries the
    /// coercion nulled out.
    pub fn normalize_temporal(&mut self, name: &str) -> usize {
        let Some(col) = self.columns.iter_mut().find(|c| c.name() == name) else {
            return 0;
        };
        let nulled = col.coerce_temporal();
        if nulled > 0 {
            debug!("Normalized column '{}': {} unparsable entries nulled", name, nulled);
        }
        nulled
    }

    /// Structural summary of the dataset.
    pub fn summary(&self) -> DatasetSummary {
        let mut numeric = 0;
        let mut categorical = 0;
        let mut temporal = 0;
        let mut missing = 0;
        for col in &self.columns {
            match col.kind() {
                ColumnKind::Numeric => numeric += 1,
                ColumnKind::Categorical => categorical += 1,
                ColumnKind::Temporal => temporal += 1,
            }
            missing += col.null_count();
        }
        DatasetSummary {
            total_rows: self.rows,
            total_columns: self.columns.len(),
            missing_values: missing,
            numeric_columns: numeric,
            categorical_columns: categorical,
            temporal_columns: temporal,
        }
    }

    /// Render the header row as a CSV line.
    pub fn csv_header(&self) -> String {
        self.columns
            .iter()
            .map(|c| csv_escape(c.name()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Render every row as a CSV line. Nulls render as empty fields.
    pub(crate) fn csv_rows(&self) -> Vec<String> {
        let labels: Vec<Vec<Option<String>>> =
            self.columns.iter().map(|c| c.as_labels()).collect();
        (0..self.rows)
            .map(|i| {
                labels
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .cloned()
                            .flatten()
                            .map(|v| csv_escape(&v))
                            .unwrap_or_default()
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect()
    }

    /// Render the whole dataset as CSV text.
    pub fn to_csv_string(&self) -> String {
        let mut out = self.csv_header();
        out.push('\n');
        for row in self.csv_rows() {
            out.push_str(&row);
            out.push('\n');
        }
        out
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Structure and health counts for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub missing_values: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub temporal_columns: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Rows: {}", self.total_rows)?;
        writeln!(f, "Total Columns: {}", self.total_columns)?;
        writeln!(f, "Missing Values: {}", self.missing_values)?;
        writeln!(f, "Numeric Columns: {}", self.numeric_columns)?;
        writeln!(f, "Categorical Columns: {}", self.categorical_columns)?;
        write!(f, "Date Columns: {}", self.temporal_columns)
    }
}
