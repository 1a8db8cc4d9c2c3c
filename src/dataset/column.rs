//! Column storage and kind inference.
//!
//! A column is named, typed storage over a fixed row count. Kind inference
//! runs once when a column is built from raw text: if every non-empty value
//! parses as a number the column is numeric, otherwise categorical. Temporal
//! columns only arise from the explicit normalization step on [`Dataset`].
//!
//! [`Dataset`]: super::Dataset

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted during temporal normalization, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d %b %Y"];

/// The inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal,
}

/// Typed column values. Nulls are explicit `None` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDate>>),
}

/// A named column of a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Build a column from raw text values, inferring its kind.
    ///
    /// Empty (after trimming) values are null. A column with at least one
    /// non-null value where every non-null value parses as a number becomes
    /// numeric; everything else is categorical.
    pub fn from_raw(name: impl Into<String>, raw: Vec<Option<String>>) -> Self {
        let non_null: Vec<&String> = raw.iter().flatten().collect();
        let numeric = !non_null.is_empty()
            && non_null.iter().all(|v| v.trim().parse::<f64>().is_ok());

        let data = if numeric {
            ColumnData::Numeric(
                raw.iter()
                    .map(|v| v.as_ref().and_then(|s| s.trim().parse::<f64>().ok()))
                    .collect(),
            )
        } else {
            ColumnData::Categorical(raw)
        };

        Self {
            name: name.into(),
            data,
        }
    }

    /// A numeric column from optional values.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// A categorical column from optional values.
    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// A temporal column from optional dates.
    pub fn temporal(name: impl Into<String>, values: Vec<Option<NaiveDate>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Temporal(values),
        }
    }

    /// Convenience: a numeric column with no nulls.
    pub fn numbers(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::numeric(name.into(), values.into_iter().map(Some).collect())
    }

    /// Convenience: a categorical column with no nulls.
    pub fn labels(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::categorical(
            name.into(),
            values.into_iter().map(|v| Some(v.into())).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Temporal(_) => ColumnKind::Temporal,
        }
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|e| e.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|e| e.is_none()).count(),
            ColumnData::Temporal(v) => v.iter().filter(|e| e.is_none()).count(),
        }
    }

    /// View the column as numbers. Non-numeric entries coerce to null.
    pub fn as_numbers(&self) -> Vec<Option<f64>> {
        match &self.data {
            ColumnData::Numeric(v) => v.clone(),
            ColumnData::Categorical(v) => v
                .iter()
                .map(|e| e.as_ref().and_then(|s| s.trim().parse::<f64>().ok()))
                .collect(),
            ColumnData::Temporal(v) => vec![None; v.len()],
        }
    }

    /// View the column as dates. Unparsable entries coerce to null.
    ///
    /// Temporal columns return their values directly; categorical columns
    /// are parsed transiently without mutating the column.
    pub fn as_dates(&self) -> Vec<Option<NaiveDate>> {
        match &self.data {
            ColumnData::Temporal(v) => v.clone(),
            ColumnData::Categorical(v) => v
                .iter()
                .map(|e| e.as_deref().and_then(parse_date))
                .collect(),
            ColumnData::Numeric(v) => vec![None; v.len()],
        }
    }

    /// View the column as display labels.
    pub fn as_labels(&self) -> Vec<Option<String>> {
        match &self.data {
            ColumnData::Categorical(v) => v.clone(),
            ColumnData::Numeric(v) => v.iter().map(|e| e.map(format_number)).collect(),
            ColumnData::Temporal(v) => v
                .iter()
                .map(|e| e.map(|d| d.format("%Y-%m-%d").to_string()))
                .collect(),
        }
    }

    /// Replace this column's values with parsed dates, keeping the name.
    ///
    /// Idempotent: a column that is already temporal is left untouched.
    /// Returns the number of non-null entries that failed to parse and
    /// became null.
    pub(crate) fn coerce_temporal(&mut self) -> usize {
        if matches!(self.data, ColumnData::Temporal(_)) {
            return 0;
        }
        let labels = self.as_labels();
        let mut nulled = 0;
        let dates: Vec<Option<NaiveDate>> = labels
            .iter()
            .map(|e| match e.as_deref() {
                Some(s) => {
                    let parsed = parse_date(s);
                    if parsed.is_none() {
                        nulled += 1;
                    }
                    parsed
                }
                None => None,
            })
            .collect();
        self.data = ColumnData::Temporal(dates);
        nulled
    }
}

/// Parse a date string against the supported formats.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Render a number the way a table cell would: integers without a
/// fractional part, everything else in shortest form.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
