//! The caller-facing query engine: text answers and chart specs.

use tracing::{debug, warn};

use crate::chart::{infer_chart_kind, ChartSpec};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::{ChartError, Result};
use crate::fallback::{dataset_documents, ContextAnswerer};
use crate::query::{
    build_chart, execute, render_text, MatchResult, OutputTemplate, QueryRule, RuleCatalog,
};

/// Resolves free-text queries against a dataset.
///
/// Holds no dataset state: the caller owns the dataset and passes it into
/// each call. The only mutation the engine performs is the explicit,
/// idempotent temporal normalization of columns the matched rule declares.
pub struct QueryEngine {
    answers: RuleCatalog,
    charts: RuleCatalog,
    config: EngineConfig,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// An engine over the built-in catalogs with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine over the built-in catalogs.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            answers: RuleCatalog::answers(),
            charts: RuleCatalog::charts(),
            config,
        }
    }

    /// An engine over custom catalogs.
    pub fn with_catalogs(answers: RuleCatalog, charts: RuleCatalog, config: EngineConfig) -> Self {
        Self {
            answers,
            charts,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer a free-text question.
    ///
    /// A matched rule executes and renders through its template. When no
    /// rule matches, the dataset is serialized as context and the query is
    /// handed to the fallback provider unmodified; its answer (or error)
    /// passes through verbatim.
    pub fn answer(
        &self,
        query: &str,
        dataset: &mut Dataset,
        fallback: &dyn ContextAnswerer,
    ) -> Result<String> {
        let columns = dataset.column_names();
        match self.answers.resolve(query, &columns) {
            MatchResult::Matched(rule) => {
                let rule = rule.clone();
                self.prepare_temporal(&rule, dataset);
                let result = execute(&rule.aggregation, dataset)?;
                match &rule.output {
                    OutputTemplate::Text(template) => Ok(render_text(&result, template)),
                    // Answer rules carry text templates; a chart template
                    // here still renders as a listing.
                    OutputTemplate::Chart { .. } => Ok(render_text(
                        &result,
                        &crate::query::TextTemplate::Listing,
                    )),
                }
            }
            MatchResult::NoMatch => {
                warn!("No answer rule matched; delegating to fallback provider");
                let documents = dataset_documents(
                    dataset,
                    self.config.fallback.rows_per_document,
                    self.config.fallback.max_context_documents,
                );
                fallback.answer(query, &documents)
            }
        }
    }

    /// Build a chart spec for a free-text chart request.
    ///
    /// Chart mode has no fallback: an unmatched query is an explicit
    /// [`ChartError::NoApplicableChart`].
    pub fn chart(&self, query: &str, dataset: &mut Dataset) -> Result<ChartSpec> {
        let columns = dataset.column_names();
        match self.charts.resolve(query, &columns) {
            MatchResult::Matched(rule) => {
                let rule = rule.clone();
                self.prepare_temporal(&rule, dataset);
                let result = execute(&rule.aggregation, dataset)?;
                let kind = infer_chart_kind(query, self.config.chart.default_kind);
                let (title, x_label) = match &rule.output {
                    OutputTemplate::Chart { title, x_label } => {
                        (title.clone(), x_label.clone())
                    }
                    OutputTemplate::Text(_) => (rule.name.clone(), String::new()),
                };
                Ok(build_chart(result, kind, title, x_label))
            }
            MatchResult::NoMatch => Err(ChartError::NoApplicableChart(query.to_string()).into()),
        }
    }

    /// Normalize the temporal columns a matched rule declares.
    fn prepare_temporal(&self, rule: &QueryRule, dataset: &mut Dataset) {
        for name in &rule.temporal_columns {
            let nulled = dataset.normalize_temporal(name);
            debug!(
                "Rule '{}': normalized temporal column '{}' ({} entries nulled)",
                rule.name, name, nulled
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dataset::Column;
    use crate::error::{FallbackError, TabulaError};

    /// Records calls instead of answering from a model.
    struct RecordingAnswerer {
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl RecordingAnswerer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ContextAnswerer for RecordingAnswerer {
        fn answer(&self, query: &str, context: &[String]) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), context.len()));
            Ok("model answer".to_string())
        }
    }

    struct FailingAnswerer;

    impl ContextAnswerer for FailingAnswerer {
        fn answer(&self, _query: &str, _context: &[String]) -> Result<String> {
            Err(FallbackError::Provider("model unavailable".to_string()).into())
        }
    }

    fn sales() -> Dataset {
        Dataset::new(vec![
            Column::labels("Region", ["North", "South"]),
            Column::numbers("Revenue", [30.0, 70.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_matched_rule_skips_fallback() {
        let engine = QueryEngine::new();
        let fallback = RecordingAnswerer::new();
        let mut ds = sales();
        let answer = engine
            .answer("What is the total revenue by region?", &mut ds, &fallback)
            .unwrap();
        assert_eq!(answer, "North: 30\nSouth: 70");
        assert!(fallback.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_query_reaches_fallback_exactly_once_verbatim() {
        let engine = QueryEngine::new();
        let fallback = RecordingAnswerer::new();
        let mut ds = sales();
        let query = "What Is The Weather LIKE?";
        let answer = engine.answer(query, &mut ds, &fallback).unwrap();
        assert_eq!(answer, "model answer");

        let calls = fallback.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, query);
        assert!(calls[0].1 >= 1);
    }

    #[test]
    fn test_fallback_errors_propagate_unmodified() {
        let engine = QueryEngine::new();
        let mut ds = sales();
        let err = engine
            .answer("unmatchable question", &mut ds, &FailingAnswerer)
            .unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Fallback(FallbackError::Provider(_))
        ));
    }

    #[test]
    fn test_chart_mode_has_no_fallback() {
        let engine = QueryEngine::new();
        let mut ds = sales();
        let err = engine.chart("histogram of nothing", &mut ds).unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Chart(ChartError::NoApplicableChart(_))
        ));
    }

    #[test]
    fn test_missing_columns_route_to_fallback() {
        // Text matches the january revenue rule, but there is no Date
        // column, so resolution falls through to the provider.
        let engine = QueryEngine::new();
        let fallback = RecordingAnswerer::new();
        let mut ds = sales();
        let answer = engine
            .answer("total revenue in january", &mut ds, &fallback)
            .unwrap();
        assert_eq!(answer, "model answer");
        assert_eq!(fallback.calls.lock().unwrap().len(), 1);
    }
}
