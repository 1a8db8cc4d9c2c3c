//! Canned chart builders over the conventional business columns.
//!
//! Each builder validates column presence, delegates to the aggregation
//! executor, and returns a [`ChartSpec`] for an external renderer.

use crate::dataset::{ColumnKind, Dataset};
use crate::error::{ChartError, Result};
use crate::query::executor::{cross_table, grouped_series};
use crate::query::formatter::build_chart;
use crate::query::{GroupKey, GroupedTable, Reduce};

use super::spec::{ChartData, ChartKind, ChartSpec};

/// Total revenue per region, descending.
pub fn revenue_by_region(dataset: &Dataset) -> Result<ChartSpec> {
    require_columns(dataset, &["Region", "Revenue"])?;
    let mut series = grouped_series(dataset, "Region", "Revenue", Reduce::Sum, None)?;
    series.sort_descending();
    Ok(build_chart(
        series.into(),
        ChartKind::Bar,
        "Total Revenue by Region",
        "Region",
    ))
}

/// Products ranked by total units sold, descending.
pub fn top_products(dataset: &Dataset) -> Result<ChartSpec> {
    require_columns(dataset, &["Product", "Units Sold"])?;
    let mut series = grouped_series(dataset, "Product", "Units Sold", Reduce::Sum, None)?;
    series.sort_descending();
    Ok(build_chart(
        series.into(),
        ChartKind::BarH,
        "Top Products by Units Sold",
        "Product",
    ))
}

/// Revenue summed per date, chronological.
pub fn revenue_over_time(dataset: &mut Dataset) -> Result<ChartSpec> {
    require_columns(dataset, &["Date", "Revenue"])?;
    dataset.normalize_temporal("Date");
    let series = grouped_series(dataset, "Date", "Revenue", Reduce::Sum, None)?;
    Ok(build_chart(
        series.into(),
        ChartKind::Line,
        "Revenue Over Time",
        "Date",
    ))
}

/// Units sold summed per date, chronological.
pub fn units_over_time(dataset: &mut Dataset) -> Result<ChartSpec> {
    require_columns(dataset, &["Date", "Units Sold"])?;
    dataset.normalize_temporal("Date");
    let series = grouped_series(dataset, "Date", "Units Sold", Reduce::Sum, None)?;
    Ok(build_chart(
        series.into(),
        ChartKind::Line,
        "Units Sold Over Time",
        "Date",
    ))
}

/// Revenue per product within each region, as a grouped bar table.
pub fn revenue_by_product_region(dataset: &Dataset) -> Result<ChartSpec> {
    require_columns(dataset, &["Region", "Product", "Revenue"])?;
    let table = cross_table(dataset, "Region", "Product", "Revenue", Reduce::Sum)?;
    Ok(build_chart(
        crate::query::AggregationResult::Table(table),
        ChartKind::Bar,
        "Revenue by Product in Each Region",
        "Region",
    ))
}

/// Pearson correlation matrix over all numeric columns.
///
/// Needs at least two numeric columns. Pairs with fewer than two complete
/// observations, or zero variance, are null cells.
pub fn correlation_heatmap(dataset: &Dataset) -> Result<ChartSpec> {
    let numeric: Vec<_> = dataset
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .collect();
    if numeric.len() < 2 {
        return Err(ChartError::NotEnoughNumeric {
            needed: 2,
            found: numeric.len(),
        }
        .into());
    }

    let names: Vec<GroupKey> = numeric
        .iter()
        .map(|c| GroupKey::Label(c.name().to_string()))
        .collect();
    let values: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.as_numbers()).collect();

    let rows = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = values
                .iter()
                .map(|other| pearson(&values[i], other))
                .collect();
            (name.clone(), cells)
        })
        .collect();

    let table = GroupedTable {
        value_name: "correlation".to_string(),
        row_dimension: "column".to_string(),
        column_dimension: "column".to_string(),
        columns: names,
        rows,
    };
    Ok(ChartSpec {
        kind: ChartKind::Heatmap,
        title: "Correlation Heatmap".to_string(),
        x_label: String::new(),
        y_label: None,
        data: ChartData::Table(table),
    })
}

fn require_columns(dataset: &Dataset, names: &[&str]) -> Result<()> {
    let missing: Vec<String> = names
        .iter()
        .filter(|n| dataset.column(n).is_none())
        .map(|n| n.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChartError::MissingColumns(missing).into())
    }
}

/// Pearson correlation over pairwise-complete observations.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        None
    } else {
        Some(cov / denom)
    }
}
