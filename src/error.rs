//! Error types for tabula.

use thiserror::Error;

/// Main error type for tabula operations.
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Fallback error: {0}")]
    Fallback(#[from] FallbackError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Dataset-related errors (loading, column access).
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is empty")]
    Empty,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

/// Chart-related errors.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No matching chart logic for query: {0}")]
    NoApplicableChart(String),

    #[error("Required columns missing: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Not enough numeric columns: need at least {needed}, found {found}")]
    NotEnoughNumeric { needed: usize, found: usize },
}

/// Errors reported by a fallback answer provider.
#[derive(Error, Debug)]
pub enum FallbackError {
    #[error("Answer provider failed: {0}")]
    Provider(String),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;
