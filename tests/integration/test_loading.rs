//! Loading CSV files from disk and downstream use of the loaded dataset.

use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use tabula::chart::insights;
use tabula::{dataset_documents, load_csv, ChartKind, ColumnKind, TabulaError};

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

#[test]
fn test_load_csv_infers_kinds_and_summary() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Date,Region,Revenue\n2024-01-05,North,100\n2024-01-12,South,\n",
    );

    let ds = load_csv(&path).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.column("Revenue").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(ds.column("Date").unwrap().kind(), ColumnKind::Categorical);

    let summary = ds.summary();
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.total_columns, 3);
    assert_eq!(summary.missing_values, 1);
    assert!(summary.to_string().contains("Total Rows: 2"));
}

#[test]
fn test_load_latin1_encoded_file() {
    let dir = TempDir::new().unwrap();
    // "Año" in ISO-8859-1; 0xF1 is not valid UTF-8.
    let path = write_file(&dir, "latin1.csv", b"A\xF1o,Revenue\n2024,10\n");

    let ds = load_csv(&path).unwrap();
    assert!(ds.column("Año").is_some());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_csv(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, TabulaError::Dataset(_)));
}

#[test]
fn test_insights_over_loaded_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Date,Region,Product,Revenue,Units Sold\n\
          2024-01-05,North,Widget A,100,10\n\
          2024-01-12,South,Widget B,200,20\n\
          2024-02-03,North,Widget B,50,5\n",
    );
    let mut ds = load_csv(&path).unwrap();

    let by_region = insights::revenue_by_region(&ds).unwrap();
    assert_eq!(by_region.title, "Total Revenue by Region");

    let over_time = insights::revenue_over_time(&mut ds).unwrap();
    assert_eq!(over_time.kind, ChartKind::Line);

    // The insight normalized Date in place; the column is now temporal.
    assert_eq!(ds.column("Date").unwrap().kind(), ColumnKind::Temporal);

    let heatmap = insights::correlation_heatmap(&ds).unwrap();
    assert_eq!(heatmap.kind, ChartKind::Heatmap);
}

#[test]
fn test_fallback_documents_from_loaded_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "sales.csv",
        b"Region,Revenue\nNorth,100\nSouth,200\nEast,50\n",
    );
    let ds = load_csv(&path).unwrap();

    let docs = dataset_documents(&ds, 2, 4);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0], "Region,Revenue\nNorth,100\nSouth,200");
    assert_eq!(docs[1], "Region,Revenue\nEast,50");
}
