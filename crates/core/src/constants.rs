//! Constants used throughout the NAMASTE core crate.
//!
//! This module contains default locations, column names and service settings so that the
//! binaries and the table builder agree on them.

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

/// Default location of the serialized terminology table loaded at startup.
pub const DEFAULT_TABLE_PATH: &str = "data/terminology_data.json";

/// Default location of the tabular mapping source consumed by ingest.
pub const DEFAULT_SOURCE_CSV_PATH: &str = "data/final_mapping.csv";

/// Column holding the lookup key.
pub const NAMASTE_TERM_COLUMN: &str = "namaste_term";

/// Columns every source row must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    NAMASTE_TERM_COLUMN,
    "namaste_code",
    "tm2_code",
    "tm2_term",
    "bio_code",
    "bio_term",
];
