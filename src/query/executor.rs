//! Aggregation execution over a dataset.
//!
//! Execution is pure with respect to the dataset: temporal columns are
//! normalized by the caller beforehand, and month filters on a
//! still-categorical column parse transiently instead of mutating it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;
use tracing::debug;

use crate::dataset::{Column, ColumnKind, Dataset};
use crate::error::{DatasetError, Result};

use super::types::{
    Aggregation, AggregationResult, GroupKey, GroupedTable, Reduce, RowFilter, Series,
};

/// Execute an aggregation against a dataset.
pub fn execute(aggregation: &Aggregation, dataset: &Dataset) -> Result<AggregationResult> {
    match aggregation {
        Aggregation::GroupReduce {
            group,
            target,
            stat,
        } => Ok(AggregationResult::Series(grouped_series(
            dataset, group, target, *stat, None,
        )?)),

        Aggregation::CountValues { column } => {
            Ok(AggregationResult::Series(count_values(dataset, column)?))
        }

        Aggregation::FilterReduce {
            filters,
            target,
            stat,
        } => {
            let mask = filter_mask(dataset, filters)?;
            let values = masked_numbers(dataset, target, &mask)?;
            Ok(AggregationResult::Scalar(stat.apply(&values)))
        }

        Aggregation::GroupExtremum {
            filters,
            group,
            target,
            stat,
        } => {
            let mask = if filters.is_empty() {
                None
            } else {
                Some(filter_mask(dataset, filters)?)
            };
            let mut series = grouped_series(dataset, group, target, *stat, mask.as_deref())?;
            // Stable descending sort: ties keep ascending group-key order,
            // so the leader is deterministic for a fixed input.
            series.sort_descending();
            Ok(AggregationResult::Series(series))
        }

        Aggregation::TopGroups {
            group,
            target,
            stat,
            limit,
        } => {
            let mut series = grouped_series(dataset, group, target, *stat, None)?;
            series.sort_descending();
            series.points.truncate(*limit);
            Ok(AggregationResult::Series(series))
        }

        Aggregation::CrossGroupReduce {
            rows,
            columns,
            target,
            stat,
        } => Ok(AggregationResult::Table(cross_table(
            dataset, rows, columns, target, *stat,
        )?)),
    }
}

fn column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column> {
    Ok(dataset
        .column(name)
        .ok_or_else(|| DatasetError::ColumnNotFound(name.to_string()))?)
}

/// Group keys for a column: dates for temporal columns, labels otherwise.
/// Null entries yield null keys, which grouping excludes.
fn group_keys(column: &Column) -> Vec<Option<GroupKey>> {
    match column.kind() {
        ColumnKind::Temporal => column
            .as_dates()
            .into_iter()
            .map(|d| d.map(GroupKey::Date))
            .collect(),
        _ => column
            .as_labels()
            .into_iter()
            .map(|l| l.map(GroupKey::Label))
            .collect(),
    }
}

/// Partition rows by the grouping column and reduce the target per
/// partition. Keys ascend. A partition whose target values are all null
/// reduces over the empty slice (sum 0.0, mean NaN).
pub(crate) fn grouped_series(
    dataset: &Dataset,
    group: &str,
    target: &str,
    stat: Reduce,
    mask: Option<&[bool]>,
) -> Result<Series> {
    let keys = group_keys(column(dataset, group)?);
    let values = column(dataset, target)?.as_numbers();

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for (i, key) in keys.into_iter().enumerate() {
        if let Some(mask) = mask {
            if !mask.get(i).copied().unwrap_or(false) {
                continue;
            }
        }
        let Some(key) = key else { continue };
        let bucket = groups.entry(key).or_default();
        if let Some(v) = values.get(i).copied().flatten() {
            bucket.push(v);
        }
    }

    let points = groups
        .into_iter()
        .map(|(key, bucket)| (key, stat.apply(&bucket)))
        .collect();
    Ok(Series::new(target, points))
}

/// Distinct-value frequencies, descending; ties keep first-appearance order.
fn count_values(dataset: &Dataset, name: &str) -> Result<Series> {
    let labels = column(dataset, name)?.as_labels();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels.into_iter().flatten() {
        if !counts.contains_key(&label) {
            order.push(label.clone());
        }
        *counts.entry(label).or_insert(0) += 1;
    }

    let points = order
        .into_iter()
        .map(|label| {
            let count = counts[&label] as f64;
            (GroupKey::Label(label), count)
        })
        .collect();
    let mut series = Series::new(name, points);
    series.sort_descending();
    Ok(series)
}

/// Evaluate all row filters into a keep-mask.
fn filter_mask(dataset: &Dataset, filters: &[RowFilter]) -> Result<Vec<bool>> {
    let mut mask = vec![true; dataset.row_count()];
    for filter in filters {
        match filter {
            RowFilter::Equals {
                column: name,
                value,
            } => {
                let labels = column(dataset, name)?.as_labels();
                for (i, keep) in mask.iter_mut().enumerate() {
                    *keep =
                        *keep && labels.get(i).and_then(|l| l.as_deref()) == Some(value.as_str());
                }
            }
            RowFilter::Month {
                column: name,
                month,
            } => {
                let dates = column(dataset, name)?.as_dates();
                for (i, keep) in mask.iter_mut().enumerate() {
                    *keep = *keep
                        && dates
                            .get(i)
                            .copied()
                            .flatten()
                            .map(|d| d.month() == *month)
                            .unwrap_or(false);
                }
            }
        }
    }
    debug!(
        "Filters kept {} of {} rows",
        mask.iter().filter(|k| **k).count(),
        mask.len()
    );
    Ok(mask)
}

/// Non-null target values for rows the mask keeps.
fn masked_numbers(dataset: &Dataset, target: &str, mask: &[bool]) -> Result<Vec<f64>> {
    let values = column(dataset, target)?.as_numbers();
    Ok(values
        .into_iter()
        .enumerate()
        .filter(|(i, _)| mask.get(*i).copied().unwrap_or(false))
        .filter_map(|(_, v)| v)
        .collect())
}

/// Reduce the target over two grouping dimensions. Combinations with no
/// rows are null cells.
pub(crate) fn cross_table(
    dataset: &Dataset,
    row_dim: &str,
    col_dim: &str,
    target: &str,
    stat: Reduce,
) -> Result<GroupedTable> {
    let row_keys = group_keys(column(dataset, row_dim)?);
    let col_keys = group_keys(column(dataset, col_dim)?);
    let values = column(dataset, target)?.as_numbers();

    let mut cells: BTreeMap<GroupKey, BTreeMap<GroupKey, Vec<f64>>> = BTreeMap::new();
    let mut all_columns: BTreeSet<GroupKey> = BTreeSet::new();
    for i in 0..dataset.row_count() {
        let (Some(row_key), Some(col_key)) = (
            row_keys.get(i).cloned().flatten(),
            col_keys.get(i).cloned().flatten(),
        ) else {
            continue;
        };
        all_columns.insert(col_key.clone());
        let bucket = cells.entry(row_key).or_default().entry(col_key).or_default();
        if let Some(v) = values.get(i).copied().flatten() {
            bucket.push(v);
        }
    }

    let columns: Vec<GroupKey> = all_columns.into_iter().collect();
    let rows = cells
        .into_iter()
        .map(|(row_key, mut by_column)| {
            let row = columns
                .iter()
                .map(|ck| by_column.remove(ck).map(|bucket| stat.apply(&bucket)))
                .collect();
            (row_key, row)
        })
        .collect();

    Ok(GroupedTable {
        value_name: target.to_string(),
        row_dimension: row_dim.to_string(),
        column_dimension: col_dim.to_string(),
        columns,
        rows,
    })
}
