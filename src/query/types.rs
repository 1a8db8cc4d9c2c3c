//! Types for query resolution: predicates, aggregation specs, and results.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Text Predicates
// ============================================================================

/// One required term of a text predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// A literal substring that must be present.
    Phrase(String),
    /// Alternative phrasings; at least one must be present.
    AnyOf(Vec<String>),
}

impl Term {
    fn matches(&self, lower_query: &str) -> bool {
        match self {
            Term::Phrase(p) => lower_query.contains(p.as_str()),
            Term::AnyOf(alts) => alts.iter().any(|p| lower_query.contains(p.as_str())),
        }
    }
}

/// A conjunction of required substrings over the lower-cased query.
///
/// This is deliberately crude: no tokenization, no scoring. Overlapping
/// phrasings are disambiguated purely by catalog order and substring
/// specificity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPredicate {
    required: Vec<Term>,
}

impl TextPredicate {
    pub fn new(required: Vec<Term>) -> Self {
        Self { required }
    }

    /// A predicate requiring every given literal phrase.
    pub fn phrases(phrases: &[&str]) -> Self {
        Self {
            required: phrases
                .iter()
                .map(|p| Term::Phrase(p.to_lowercase()))
                .collect(),
        }
    }

    /// True when every required term is present in the lower-cased query.
    pub fn matches(&self, lower_query: &str) -> bool {
        self.required.iter().all(|t| t.matches(lower_query))
    }
}

// ============================================================================
// Aggregation Specifications
// ============================================================================

/// Reduction statistic applied to the non-null values of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduce {
    Sum,
    Mean,
}

impl Reduce {
    /// Reduce a slice of non-null values. An empty slice sums to 0.0 and
    /// has a NaN mean.
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Reduce::Sum => values.iter().sum(),
            Reduce::Mean => {
                if values.is_empty() {
                    f64::NAN
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
        }
    }
}

/// A row-level filter applied before reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFilter {
    /// Keep rows whose column equals the given label.
    Equals { column: String, value: String },
    /// Keep rows whose temporal column falls in the given calendar month.
    Month { column: String, month: u32 },
}

/// A grouping/filtering/reduction operation over dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Partition by a grouping column, reduce the target per partition.
    /// Keys ascend: alphabetical for labels, chronological for dates.
    GroupReduce {
        group: String,
        target: String,
        stat: Reduce,
    },
    /// Distinct-value frequencies of a categorical column, descending.
    CountValues { column: String },
    /// Filter rows, then reduce the target over what remains.
    FilterReduce {
        filters: Vec<RowFilter>,
        target: String,
        stat: Reduce,
    },
    /// Filter, group-reduce, then reorder strictly descending by value so
    /// the leading entry is the extremal group.
    GroupExtremum {
        #[serde(default)]
        filters: Vec<RowFilter>,
        group: String,
        target: String,
        stat: Reduce,
    },
    /// Group-reduce, then keep the N largest entries, descending.
    TopGroups {
        group: String,
        target: String,
        stat: Reduce,
        limit: usize,
    },
    /// Two grouping dimensions producing a table; missing combinations are
    /// null cells.
    CrossGroupReduce {
        rows: String,
        columns: String,
        target: String,
        stat: Reduce,
    },
}

// ============================================================================
// Output Templates
// ============================================================================

/// How a text answer is rendered from an aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTemplate {
    /// "key: value" per line, in the result's own order.
    Listing,
    /// "{leader} {label}:" followed by the listing. The leader is the first
    /// entry of the (descending) series.
    LeaderWithListing { label: String },
    /// "{label}: {value}", with optional fixed decimal places.
    Sentence {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimals: Option<u8>,
    },
}

/// The output a rule produces: a text answer or a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTemplate {
    Text(TextTemplate),
    Chart { title: String, x_label: String },
}

// ============================================================================
// Aggregation Results
// ============================================================================

/// A grouping key: a category label or a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Date(NaiveDate),
    Label(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            GroupKey::Label(s) => write!(f, "{}", s),
        }
    }
}

/// A named, ordered mapping from group key to number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(GroupKey, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(GroupKey, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value for a label key, if present.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|(k, _)| matches!(k, GroupKey::Label(l) if l == label))
            .map(|(_, v)| *v)
    }

    /// Sum of all point values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }

    /// The first point, which for extremal and top-N series is the leader.
    pub fn leader(&self) -> Option<&(GroupKey, f64)> {
        self.points.first()
    }

    /// Stable sort descending by value. NaN values sink to the end, and
    /// ties keep their existing relative order.
    pub fn sort_descending(&mut self) {
        self.points.sort_by(|a, b| {
            let av = if a.1.is_nan() { f64::NEG_INFINITY } else { a.1 };
            let bv = if b.1.is_nan() { f64::NEG_INFINITY } else { b.1 };
            bv.partial_cmp(&av).unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

/// A two-dimensional grouped result: row keys by column keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedTable {
    /// Name of the reduced value (the target column).
    pub value_name: String,
    /// Name of the row grouping dimension.
    pub row_dimension: String,
    /// Name of the column grouping dimension.
    pub column_dimension: String,
    /// Column keys, ascending.
    pub columns: Vec<GroupKey>,
    /// Row key plus one optional cell per column key.
    pub rows: Vec<(GroupKey, Vec<Option<f64>>)>,
}

/// The typed result of executing an aggregation. Created per request and
/// discarded after formatting; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationResult {
    Scalar(f64),
    Series(Series),
    Table(GroupedTable),
}

impl From<Series> for AggregationResult {
    fn from(series: Series) -> Self {
        AggregationResult::Series(series)
    }
}

impl From<GroupedTable> for AggregationResult {
    fn from(table: GroupedTable) -> Self {
        AggregationResult::Table(table)
    }
}
