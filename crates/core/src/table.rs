//! Terminology table construction.
//!
//! The table maps each NAMASTE term to its ICD-11 TM2 and biomedicine counterparts. It is built
//! once, either from the tabular CSV source or from the serialized JSON table written by ingest,
//! and is never mutated afterwards.
//!
//! ## Build rules
//!
//! - Rows are processed in source order.
//! - A later row with the same `namaste_term` fully replaces the earlier one. The term keeps the
//!   position of its first occurrence.
//! - Any malformed row aborts the build; callers never observe a partially built table.
//!
//! ## Serialized form
//!
//! The JSON table is an object keyed by `namaste_term` whose values carry the other five fields.
//! Key order is preserved in both directions.

use crate::config::TableFormat;
use crate::constants::REQUIRED_COLUMNS;
use crate::{TerminologyError, TerminologyResult};
use fhir::TermSelection;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// One row of the terminology table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyEntry {
    pub namaste_term: String,
    pub namaste_code: String,
    pub tm2_code: String,
    pub tm2_term: String,
    pub bio_code: String,
    pub bio_term: String,
}

impl From<&TerminologyEntry> for TermSelection {
    fn from(entry: &TerminologyEntry) -> Self {
        TermSelection {
            namaste_term: entry.namaste_term.clone(),
            namaste_code: entry.namaste_code.clone(),
            tm2_code: entry.tm2_code.clone(),
            tm2_term: entry.tm2_term.clone(),
            bio_code: entry.bio_code.clone(),
            bio_term: entry.bio_term.clone(),
        }
    }
}

/// Immutable, insertion-ordered lookup table keyed by `namaste_term`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerminologyTable {
    entries: Vec<TerminologyEntry>,
    index: HashMap<String, usize>,
}

impl TerminologyTable {
    /// Build a table from in-memory rows, applying last-write-wins on duplicate terms.
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TerminologyEntry>,
    {
        let mut table = Self::default();
        for row in rows {
            table.insert(row);
        }
        table
    }

    /// Load a table from `path`, choosing CSV or JSON parsing from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`TerminologyError::SourceUnavailable`] if the file cannot be opened or read, and
    /// [`TerminologyError::MalformedRecord`] if any row lacks a required field.
    pub fn load(path: &Path) -> TerminologyResult<Self> {
        let table = match TableFormat::from_path(path) {
            TableFormat::Csv => Self::from_csv_path(path)?,
            TableFormat::Json => Self::from_json_path(path)?,
        };

        tracing::info!(
            "loaded {} terminology entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from a CSV file with the six required columns.
    pub fn from_csv_path(path: &Path) -> TerminologyResult<Self> {
        let file = File::open(path).map_err(|source| TerminologyError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        read_csv(file, path)
    }

    /// Build a table from any CSV byte stream with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> TerminologyResult<Self> {
        read_csv(reader, Path::new("<reader>"))
    }

    /// Build a table from the serialized JSON table on disk.
    pub fn from_json_path(path: &Path) -> TerminologyResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|source| TerminologyError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&text)
    }

    /// Build a table from serialized JSON text.
    ///
    /// Uses `serde_path_to_error` so that a malformed value is reported against the term that
    /// carries it (e.g. `Jwara`).
    pub fn from_json_str(text: &str) -> TerminologyResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(text);

        let wire = match serde_path_to_error::deserialize::<_, TableWire>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let location = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(TerminologyError::MalformedRecord {
                    location,
                    reason: source.to_string(),
                });
            }
        };

        deserializer
            .end()
            .map_err(|err| TerminologyError::MalformedRecord {
                location: "<root>".into(),
                reason: err.to_string(),
            })?;

        Ok(Self::from_entries(
            wire.0
                .into_iter()
                .map(|(namaste_term, mapping)| mapping.into_entry(namaste_term)),
        ))
    }

    /// Serialize the table as pretty-printed JSON, preserving term order.
    pub fn to_json_string(&self) -> TerminologyResult<String> {
        serde_json::to_string_pretty(self).map_err(TerminologyError::Serialization)
    }

    /// Write the serialized JSON table to `path`.
    pub fn write_json(&self, path: &Path) -> TerminologyResult<()> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(TerminologyError::FileWrite)
    }

    /// Exact, case-sensitive lookup by key.
    pub fn get(&self, namaste_term: &str) -> Option<&TerminologyEntry> {
        self.index
            .get(namaste_term)
            .and_then(|&slot| self.entries.get(slot))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TerminologyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: TerminologyEntry) {
        match self.index.get(&entry.namaste_term).copied() {
            Some(slot) => {
                tracing::debug!(
                    "duplicate term {:?}: later row replaces earlier",
                    entry.namaste_term
                );
                self.entries[slot] = entry;
            }
            None => {
                self.index
                    .insert(entry.namaste_term.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

impl<'a> IntoIterator for &'a TerminologyTable {
    type Item = &'a TerminologyEntry;
    type IntoIter = std::slice::Iter<'a, TerminologyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TerminologyTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.namaste_term, &MappingRef::from(entry))?;
        }
        map.end()
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// The five fields stored against a term in the serialized table.
#[derive(Debug, Deserialize)]
struct MappingWire {
    namaste_code: String,
    tm2_code: String,
    tm2_term: String,
    bio_code: String,
    bio_term: String,
}

impl MappingWire {
    fn into_entry(self, namaste_term: String) -> TerminologyEntry {
        TerminologyEntry {
            namaste_term,
            namaste_code: self.namaste_code,
            tm2_code: self.tm2_code,
            tm2_term: self.tm2_term,
            bio_code: self.bio_code,
            bio_term: self.bio_term,
        }
    }
}

#[derive(Serialize)]
struct MappingRef<'a> {
    namaste_code: &'a str,
    tm2_code: &'a str,
    tm2_term: &'a str,
    bio_code: &'a str,
    bio_term: &'a str,
}

impl<'a> From<&'a TerminologyEntry> for MappingRef<'a> {
    fn from(entry: &'a TerminologyEntry) -> Self {
        MappingRef {
            namaste_code: &entry.namaste_code,
            tm2_code: &entry.tm2_code,
            tm2_term: &entry.tm2_term,
            bio_code: &entry.bio_code,
            bio_term: &entry.bio_term,
        }
    }
}

/// Ordered key/value pairs of the JSON table, duplicates included.
struct TableWire(Vec<(String, MappingWire)>);

impl<'de> Deserialize<'de> for TableWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = TableWire;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of NAMASTE terms to their mappings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((term, mapping)) = map.next_entry::<String, MappingWire>()? {
                    rows.push((term, mapping));
                }
                Ok(TableWire(rows))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

// ============================================================================
// CSV helpers (internal)
// ============================================================================

fn read_csv<R: Read>(reader: R, origin: &Path) -> TerminologyResult<TerminologyTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| csv_error(err, origin))?
        .clone();
    let columns = column_positions(&headers)?;

    // Collect everything first so a late failure never leaves a partial table behind.
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| csv_error(err, origin))?;
        rows.push(entry_from_record(&record, &columns, idx + 1)?);
    }

    Ok(TerminologyTable::from_entries(rows))
}

fn column_positions(headers: &csv::StringRecord) -> TerminologyResult<[usize; 6]> {
    let mut positions = [0usize; 6];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim_matches('\u{feff}').trim() == name)
            .ok_or_else(|| TerminologyError::MalformedRecord {
                location: "header".into(),
                reason: format!("missing required column `{name}`"),
            })?;
    }
    Ok(positions)
}

fn entry_from_record(
    record: &csv::StringRecord,
    columns: &[usize; 6],
    row: usize,
) -> TerminologyResult<TerminologyEntry> {
    let field = |i: usize| -> TerminologyResult<String> {
        record
            .get(columns[i])
            .map(str::to_string)
            .ok_or_else(|| TerminologyError::MalformedRecord {
                location: format!("row {row}"),
                reason: format!("missing value for column `{}`", REQUIRED_COLUMNS[i]),
            })
    };

    Ok(TerminologyEntry {
        namaste_term: field(0)?,
        namaste_code: field(1)?,
        tm2_code: field(2)?,
        tm2_term: field(3)?,
        bio_code: field(4)?,
        bio_term: field(5)?,
    })
}

fn csv_error(err: csv::Error, origin: &Path) -> TerminologyError {
    let location = err
        .position()
        .map(|pos| format!("line {}", pos.line()))
        .unwrap_or_else(|| "<unknown>".into());
    let reason = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(source) => TerminologyError::SourceUnavailable {
            path: origin.to_path_buf(),
            source,
        },
        _ => TerminologyError::MalformedRecord { location, reason },
    }
}
