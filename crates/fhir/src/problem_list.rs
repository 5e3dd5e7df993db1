//! FHIR problem-list rendering for a NAMASTE → ICD-11 mapping.
//!
//! Responsibilities:
//! - Define the caller-facing [`TermSelection`] payload
//! - Define the wire model of the generated `List` resource and its contained `Condition`s
//! - Render a selection into the fixed document shape
//!
//! Notes:
//! - Every field of the output is either a fixed literal or a copy/interpolation of one
//!   selection field
//! - Field order in the serialised JSON follows struct declaration order, so rendering the same
//!   selection twice yields byte-identical output

use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Code system URI for NAMASTE terms.
pub const NAMASTE_SYSTEM: &str = "http://terminology.moh.gov.in/CodeSystem/namaste";

/// Code system URI for ICD-11 Traditional Medicine Module 2.
pub const ICD11_TM2_SYSTEM: &str = "http://id.who.int/icd11/tm2";

/// Code system URI for ICD-11 biomedicine (MMS linearization).
pub const ICD11_BIO_SYSTEM: &str = "http://id.who.int/icd11/mms";

const LIST_ID: &str = "example-problem-list";
const LIST_STATUS: &str = "current";
const LIST_MODE: &str = "working";
const LIST_TITLE: &str = "Patient Problem List";
const PATIENT_REFERENCE: &str = "Patient/example";
const PATIENT_DISPLAY: &str = "Example Patient";
const SOURCE_CONDITION_ID: &str = "condition-namaste";
const TARGET_CONDITION_ID: &str = "condition-icd11";

// ============================================================================
// Public domain-level types
// ============================================================================

/// A fully specified mapping chosen by the caller.
///
/// All six fields are required. Empty strings are accepted; the values are not checked against
/// any terminology table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermSelection {
    pub namaste_term: String,
    pub namaste_code: String,
    pub tm2_code: String,
    pub tm2_term: String,
    pub bio_code: String,
    pub bio_term: String,
}

// ============================================================================
// Wire types
// ============================================================================

/// FHIR `List` resource carrying the source and target conditions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalMappingDocument {
    pub resource_type: String,
    pub id: String,
    pub status: String,
    pub mode: String,
    pub title: String,
    pub subject: Reference,
    pub entry: Vec<ListEntry>,
    pub contained: Vec<Condition>,
}

/// One `List.entry`, pointing at a contained resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListEntry {
    pub item: Reference,
}

/// FHIR `Reference`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reference {
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Contained FHIR `Condition` resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub resource_type: String,
    pub id: String,
    pub code: CodeableConcept,
    pub subject: Reference,
}

/// FHIR `CodeableConcept`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    pub text: String,
}

/// FHIR `Coding`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

// ============================================================================
// Public ClinicalMapping operations
// ============================================================================

/// Clinical mapping document operations.
///
/// This is a zero-sized type used for namespacing document-related operations.
/// All methods are associated functions.
pub struct ClinicalMapping;

impl ClinicalMapping {
    /// Decode a [`TermSelection`] from a JSON request body.
    ///
    /// This uses `serde_path_to_error` to surface the path of the failing field when the body
    /// does not match the selection schema.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidSelection`] if:
    /// - the body is not valid JSON,
    /// - any of the six fields is missing,
    /// - any field is not a string.
    pub fn parse_selection(json: &[u8]) -> FhirResult<TermSelection> {
        let mut deserializer = serde_json::Deserializer::from_slice(json);

        let selection =
            match serde_path_to_error::deserialize::<_, TermSelection>(&mut deserializer) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let path = err.path().to_string();
                    let source = err.into_inner();
                    let path = if path.is_empty() || path == "." {
                        "<root>"
                    } else {
                        path.as_str()
                    };
                    return Err(FhirError::InvalidSelection(format!(
                        "selection schema mismatch at {path}: {source}"
                    )));
                }
            };

        deserializer
            .end()
            .map_err(|e| FhirError::InvalidSelection(format!("trailing data after selection: {e}")))?;

        Ok(selection)
    }

    /// Build the problem-list document for a selection.
    ///
    /// Rendering is total: any selection, including one with empty fields or codes unknown to
    /// the terminology table, yields a well-formed document.
    pub fn generate(selection: &TermSelection) -> ClinicalMappingDocument {
        ClinicalMappingDocument {
            resource_type: "List".into(),
            id: LIST_ID.into(),
            status: LIST_STATUS.into(),
            mode: LIST_MODE.into(),
            title: LIST_TITLE.into(),
            subject: Reference {
                reference: PATIENT_REFERENCE.into(),
                display: Some(PATIENT_DISPLAY.into()),
            },
            entry: vec![
                ListEntry {
                    item: Reference {
                        reference: format!("#{SOURCE_CONDITION_ID}"),
                        display: Some(format!("{} (NAMAST-E)", selection.namaste_term)),
                    },
                },
                ListEntry {
                    item: Reference {
                        reference: format!("#{TARGET_CONDITION_ID}"),
                        display: Some(format!("{} (ICD-11)", selection.bio_term)),
                    },
                },
            ],
            contained: vec![source_condition(selection), target_condition(selection)],
        }
    }

    /// Render a document as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Serialization`] if serialization fails.
    pub fn render(document: &ClinicalMappingDocument) -> FhirResult<String> {
        Ok(serde_json::to_string_pretty(document)?)
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn source_condition(selection: &TermSelection) -> Condition {
    condition(
        SOURCE_CONDITION_ID,
        vec![coding(
            NAMASTE_SYSTEM,
            &selection.namaste_code,
            &selection.namaste_term,
        )],
        format!("{} (Ayurveda)", selection.namaste_term),
    )
}

fn target_condition(selection: &TermSelection) -> Condition {
    condition(
        TARGET_CONDITION_ID,
        vec![
            coding(ICD11_TM2_SYSTEM, &selection.tm2_code, &selection.tm2_term),
            coding(ICD11_BIO_SYSTEM, &selection.bio_code, &selection.bio_term),
        ],
        format!("{} (ICD-11 TM2 & Biomedicine)", selection.bio_term),
    )
}

fn condition(id: &str, coding: Vec<Coding>, text: String) -> Condition {
    Condition {
        resource_type: "Condition".into(),
        id: id.into(),
        code: CodeableConcept { coding, text },
        subject: Reference {
            reference: PATIENT_REFERENCE.into(),
            display: None,
        },
    }
}

fn coding(system: &str, code: &str, display: &str) -> Coding {
    Coding {
        system: system.into(),
        code: code.into(),
        display: display.into(),
    }
}
