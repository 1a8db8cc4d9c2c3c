//! Configuration for the query engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;
use crate::error::{ConfigError, Result};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fallback: FallbackConfig,
    pub chart: ChartConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.fallback.rows_per_document == 0 {
            return Err(ConfigError::Invalid(
                "fallback.rows_per_document must be > 0".to_string(),
            )
            .into());
        }
        if self.fallback.max_context_documents == 0 {
            return Err(ConfigError::Invalid(
                "fallback.max_context_documents must be > 0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Sizing of the context handed to the fallback answer provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Rows per serialized CSV document.
    pub rows_per_document: usize,
    /// Maximum number of context documents passed to the provider.
    pub max_context_documents: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            rows_per_document: 50,
            max_context_documents: 4,
        }
    }
}

/// Chart-mode defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Kind used when the query names neither "line" nor "pie".
    pub default_kind: ChartKind,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_kind: ChartKind::Bar,
        }
    }
}
