//! End-to-end chart resolution for every built-in chart rule.

use tabula::{ChartData, ChartError, ChartKind, Dataset, QueryEngine, TabulaError};

const SALES_CSV: &str = "\
Date,Region,Product,Revenue,Units Sold,Unit Price
2024-01-05,North,Widget A,100,10,10
2024-01-05,South,Widget B,200,10,20
2024-01-12,North,Widget B,120,6,20
2024-02-03,South,Widget A,80,8,10
2024-02-03,North,Widget C,90,9,10
";

fn sales() -> Dataset {
    Dataset::from_csv_bytes(SALES_CSV.as_bytes()).unwrap()
}

fn chart(query: &str) -> tabula::ChartSpec {
    let engine = QueryEngine::new();
    let mut ds = sales();
    engine.chart(query, &mut ds).unwrap()
}

#[test]
fn test_revenue_by_region_bar_chart() {
    let spec = chart("Bar chart of revenue by region");
    assert_eq!(spec.kind, ChartKind::Bar);
    assert_eq!(spec.title, "Revenue by Region");
    assert_eq!(spec.x_label, "Region");
    assert_eq!(spec.y_label.as_deref(), Some("Revenue"));
    let ChartData::Series(series) = &spec.data else {
        panic!("expected series");
    };
    assert_eq!(series.get("North"), Some(310.0));
    assert_eq!(series.get("South"), Some(280.0));
}

#[test]
fn test_product_distribution_pie_chart() {
    let spec = chart("Pie chart of product distribution");
    assert_eq!(spec.kind, ChartKind::Pie);
    assert_eq!(spec.title, "Product Distribution");
    let ChartData::Series(series) = &spec.data else {
        panic!("expected series");
    };
    // Widget A and Widget B tie at 2; first appearance wins.
    let keys: Vec<String> = series.points.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["Widget A", "Widget B", "Widget C"]);
}

#[test]
fn test_units_sold_by_product_chart() {
    let spec = chart("Show units sold by product");
    assert_eq!(spec.kind, ChartKind::Bar);
    assert_eq!(spec.title, "Units Sold by Product");
    let ChartData::Series(series) = &spec.data else {
        panic!("expected series");
    };
    assert_eq!(series.get("Widget A"), Some(18.0));
    assert_eq!(series.get("Widget B"), Some(16.0));
}

#[test]
fn test_revenue_over_time_line_chart() {
    let spec = chart("Line chart of revenue over time");
    assert_eq!(spec.kind, ChartKind::Line);
    assert_eq!(spec.title, "Revenue Over Time");
    let ChartData::Series(series) = &spec.data else {
        panic!("expected series");
    };
    let keys: Vec<String> = series.points.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["2024-01-05", "2024-01-12", "2024-02-03"]);
    assert_eq!(series.points[0].1, 300.0);
}

#[test]
fn test_units_sold_over_time_chart() {
    let spec = chart("units sold over time");
    assert_eq!(spec.title, "Units Sold Over Time");
    // No "line" or "pie" in the query, so the default kind applies.
    assert_eq!(spec.kind, ChartKind::Bar);
}

#[test]
fn test_catalog_order_disambiguates_overlapping_text() {
    // Mentions both "units sold" + "product" and "units sold over time";
    // the by-product rule comes first in the catalog.
    let spec = chart("line chart of units sold over time by product");
    assert_eq!(spec.title, "Units Sold by Product");
    assert_eq!(spec.kind, ChartKind::Line);
}

#[test]
fn test_kind_inference_is_independent_of_rule() {
    let spec = chart("pie chart of revenue by region");
    assert_eq!(spec.title, "Revenue by Region");
    assert_eq!(spec.kind, ChartKind::Pie);
}

#[test]
fn test_no_applicable_chart_signal() {
    let engine = QueryEngine::new();
    let mut ds = sales();
    let err = engine
        .chart("scatter plot of shoe sizes", &mut ds)
        .unwrap_err();
    assert!(matches!(
        err,
        TabulaError::Chart(ChartError::NoApplicableChart(_))
    ));
}

#[test]
fn test_missing_columns_yield_no_chart_not_fallback() {
    let engine = QueryEngine::new();
    let mut ds = Dataset::from_csv_bytes(b"Product,Revenue\nWidget A,10\n").unwrap();
    // Text matches the revenue-by-region rule, but Region is absent.
    let err = engine
        .chart("bar chart of revenue by region", &mut ds)
        .unwrap_err();
    assert!(matches!(
        err,
        TabulaError::Chart(ChartError::NoApplicableChart(_))
    ));
}
