//! tabula: rule-driven question answering and chart generation over
//! tabular business data.
//!
//! A free-text query plus the columns actually present in the dataset
//! resolve to a concrete aggregation through an ordered rule catalog.
//! Matched queries execute locally; unmatched text questions hand off to a
//! retrieval-augmented answer provider behind a trait boundary, and
//! unmatched chart requests surface an explicit "no applicable chart"
//! error.
//!
//! # Architecture
//!
//! - `dataset/` - typed columns, CSV loading, temporal normalization
//! - `query/` - rule catalog, matcher, aggregation executor, formatter
//! - `chart/` - chart specs, kind inference, canned insight builders
//! - `fallback` - the retrieval-augmented answer boundary
//! - `engine` - the caller-facing entry points
//!
//! # Example
//!
//! ```ignore
//! use tabula::{load_csv, QueryEngine};
//!
//! let mut dataset = load_csv("sales.csv")?;
//! let engine = QueryEngine::new();
//! let answer = engine.answer("total revenue by region", &mut dataset, &provider)?;
//! let chart = engine.chart("pie chart of product distribution", &mut dataset)?;
//! ```

pub mod chart;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod query;

pub use chart::{infer_chart_kind, ChartData, ChartKind, ChartSpec};
pub use config::{ChartConfig, EngineConfig, FallbackConfig};
pub use dataset::{load_csv, Column, ColumnData, ColumnKind, Dataset, DatasetSummary};
pub use engine::QueryEngine;
pub use error::{
    ChartError, ConfigError, DatasetError, FallbackError, Result, TabulaError,
};
pub use fallback::{dataset_documents, ContextAnswerer};
pub use query::{
    Aggregation, AggregationResult, GroupKey, GroupedTable, MatchResult, OutputTemplate, QueryRule,
    Reduce, RowFilter, RuleCatalog, Series, Term, TextPredicate, TextTemplate,
};
