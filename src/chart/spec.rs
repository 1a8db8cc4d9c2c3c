//! Chart specifications handed to an external renderer.

use serde::{Deserialize, Serialize};

use crate::query::{GroupedTable, Series};

/// The kind of chart to render.
///
/// `Bar`, `Line` and `Pie` are reachable from query-text inference;
/// `BarH` and `Heatmap` are produced only by the insight builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    BarH,
    Line,
    Pie,
    Heatmap,
}

impl ChartKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bar => "bar",
            Self::BarH => "barh",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Heatmap => "heatmap",
        }
    }
}

/// The data a chart plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartData {
    Series(Series),
    Table(GroupedTable),
}

/// A structured chart description: data, kind, title, and axis labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub data: ChartData,
}

/// Infer the chart kind from the query text, independent of which rule
/// matched. "pie" wins over "line" when both appear; neither falls back to
/// the given default. Case-insensitive.
pub fn infer_chart_kind(query: &str, default: ChartKind) -> ChartKind {
    let lower = query.to_lowercase();
    if lower.contains("pie") {
        ChartKind::Pie
    } else if lower.contains("line") {
        ChartKind::Line
    } else {
        default
    }
}
