//! Rendering aggregation results into text answers and chart specs.

use crate::chart::{ChartData, ChartKind, ChartSpec};
use crate::dataset::format_number;

use super::types::{AggregationResult, Series, TextTemplate};

/// Render a result through a text template.
pub fn render_text(result: &AggregationResult, template: &TextTemplate) -> String {
    match template {
        TextTemplate::Listing => render_listing(result),

        TextTemplate::LeaderWithListing { label } => match result {
            AggregationResult::Series(series) => match series.leader() {
                Some((key, _)) => {
                    format!("{} {}:\n{}", key, label, render_listing(result))
                }
                None => "No matching rows.".to_string(),
            },
            _ => render_listing(result),
        },

        TextTemplate::Sentence { label, decimals } => match result {
            AggregationResult::Scalar(value) => match decimals {
                Some(places) => {
                    format!("{}: {:.prec$}", label, value, prec = *places as usize)
                }
                None => format!("{}: {}", label, format_number(*value)),
            },
            _ => format!("{}:\n{}", label, render_listing(result)),
        },
    }
}

/// "key: value" per line, in the result's own order.
fn render_listing(result: &AggregationResult) -> String {
    match result {
        AggregationResult::Scalar(value) => format_number(*value),
        AggregationResult::Series(series) => {
            if series.is_empty() {
                return "(no data)".to_string();
            }
            series
                .points
                .iter()
                .map(|(key, value)| format!("{}: {}", key, format_number(*value)))
                .collect::<Vec<_>>()
                .join("\n")
        }
        AggregationResult::Table(table) => {
            let mut lines = Vec::new();
            for (row_key, cells) in &table.rows {
                for (col_key, cell) in table.columns.iter().zip(cells) {
                    if let Some(value) = cell {
                        lines.push(format!("{} / {}: {}", row_key, col_key, format_number(*value)));
                    }
                }
            }
            if lines.is_empty() {
                "(no data)".to_string()
            } else {
                lines.join("\n")
            }
        }
    }
}

/// Build a chart spec from an executed result.
///
/// The y-label is the series' (or table value's) name; the kind comes from
/// query-text inference, independent of which rule matched.
pub fn build_chart(
    result: AggregationResult,
    kind: ChartKind,
    title: impl Into<String>,
    x_label: impl Into<String>,
) -> ChartSpec {
    let (data, y_label) = match result {
        AggregationResult::Series(series) => {
            let y = series.name.clone();
            (ChartData::Series(series), Some(y))
        }
        AggregationResult::Table(table) => {
            let y = table.value_name.clone();
            (ChartData::Table(table), Some(y))
        }
        AggregationResult::Scalar(value) => {
            // Degenerate but renderable: a single-point series.
            let series = Series::new(
                "value",
                vec![(super::types::GroupKey::Label("value".into()), value)],
            );
            (ChartData::Series(series), None)
        }
    };
    ChartSpec {
        kind,
        title: title.into(),
        x_label: x_label.into(),
        y_label,
        data,
    }
}
