//! FHIR wire/boundary support for the NAMASTE terminology service.
//!
//! This crate provides **wire models** and **rendering helpers** for the clinical mapping
//! document emitted when a NAMASTE term is mapped onto ICD-11:
//! - a FHIR `List` resource acting as a problem list
//! - two contained `Condition` resources (NAMASTE source, ICD-11 TM2 + biomedicine target)
//!
//! This crate focuses on:
//! - FHIR semantic alignment of the generated JSON
//! - strict decoding of the caller-supplied selection
//! - deterministic rendering (no clocks, no random identifiers)
//!
//! It never consults the terminology table; the caller's selection is trusted as-is.

pub mod problem_list;

// Re-export facade
pub use problem_list::ClinicalMapping;

// Re-export public wire-level types
pub use problem_list::{
    ClinicalMappingDocument, CodeableConcept, Coding, Condition, ListEntry, Reference,
    TermSelection,
};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("failed to serialize FHIR resource: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
