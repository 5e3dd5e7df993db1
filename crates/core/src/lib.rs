//! # NAMASTE Core
//!
//! Core business logic for the NAMASTE → ICD-11 terminology service.
//!
//! This crate contains pure data operations:
//! - Building the terminology table from the CSV source or the serialized JSON table
//! - Case-insensitive substring search over that table
//! - Startup configuration shared by the binaries
//!
//! **No API concerns**: HTTP servers and request decoding belong in `api-rest`; FHIR document
//! rendering lives in the `fhir` crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod search;
pub mod table;

pub use config::{ServiceConfig, TableFormat};
pub use constants::{DEFAULT_REST_ADDR, DEFAULT_SOURCE_CSV_PATH, DEFAULT_TABLE_PATH};
pub use error::{TerminologyError, TerminologyResult};
pub use table::{TerminologyEntry, TerminologyTable};

use std::sync::Arc;

/// Read-only terminology operations over a table loaded once at startup.
///
/// Cloning is cheap: all clones share the same immutable table.
#[derive(Clone, Debug)]
pub struct TerminologyService {
    table: Arc<TerminologyTable>,
}

impl TerminologyService {
    /// Wrap an already built table.
    pub fn new(table: TerminologyTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Build the table from the configured source.
    ///
    /// # Errors
    ///
    /// Propagates [`TerminologyError::SourceUnavailable`] and
    /// [`TerminologyError::MalformedRecord`] from the table builder. Startup should abort on
    /// either; there is no degraded mode.
    pub fn load(cfg: &ServiceConfig) -> TerminologyResult<Self> {
        TerminologyTable::load(cfg.table_path()).map(Self::new)
    }

    pub fn table(&self) -> &TerminologyTable {
        &self.table
    }

    /// Search terms by case-insensitive substring, returning owned records.
    pub fn search(&self, query: Option<&str>) -> Vec<TerminologyEntry> {
        self.table.search(query).into_iter().cloned().collect()
    }
}
