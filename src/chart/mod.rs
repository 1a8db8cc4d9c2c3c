//! Chart specifications and the canned insight builders.

pub mod insights;
mod spec;

pub use spec::{infer_chart_kind, ChartData, ChartKind, ChartSpec};
