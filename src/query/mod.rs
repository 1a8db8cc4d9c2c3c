//! Query resolution: rule catalog, matcher, aggregation executor, and
//! response formatter.

pub mod catalog;
pub mod executor;
pub mod formatter;
pub mod matcher;
pub mod types;

pub use catalog::{QueryRule, RuleCatalog};
pub use executor::execute;
pub use formatter::{build_chart, render_text};
pub use matcher::MatchResult;
pub use types::{
    Aggregation, AggregationResult, GroupKey, GroupedTable, OutputTemplate, Reduce, RowFilter,
    Series, Term, TextPredicate, TextTemplate,
};
