//! Service runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the services. Request handlers never read environment variables.

use crate::constants::{DEFAULT_REST_ADDR, DEFAULT_TABLE_PATH};
use crate::{TerminologyError, TerminologyResult};
use std::path::{Path, PathBuf};

/// Source format of the terminology table, chosen from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    /// Tabular mapping source with the six named columns.
    Csv,
    /// Serialized table produced by ingest.
    Json,
}

impl TableFormat {
    /// `.csv` (any case) selects [`TableFormat::Csv`]; everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
            _ => TableFormat::Json,
        }
    }
}

/// Service configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    rest_addr: String,
    table_path: PathBuf,
}

impl ServiceConfig {
    /// Create a new `ServiceConfig`.
    pub fn new(rest_addr: String, table_path: PathBuf) -> TerminologyResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(TerminologyError::InvalidInput(
                "rest_addr cannot be empty".into(),
            ));
        }
        if table_path.as_os_str().is_empty() {
            return Err(TerminologyError::InvalidInput(
                "table_path cannot be empty".into(),
            ));
        }

        Ok(Self {
            rest_addr: rest_addr.trim().to_string(),
            table_path,
        })
    }

    /// Build a config from optional raw values (typically read from the environment).
    ///
    /// Missing or whitespace-only values fall back to [`DEFAULT_REST_ADDR`] and
    /// [`DEFAULT_TABLE_PATH`].
    pub fn from_env_values(
        rest_addr: Option<String>,
        table_path: Option<String>,
    ) -> TerminologyResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let table_path = non_blank(table_path).unwrap_or_else(|| DEFAULT_TABLE_PATH.into());

        Self::new(rest_addr, PathBuf::from(table_path))
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }
}
