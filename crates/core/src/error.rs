use std::path::PathBuf;

/// Errors raised while configuring the service or building the terminology table.
///
/// Build-time errors are fatal to startup: no partially loaded table is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum TerminologyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("terminology source unavailable ({path}): {source}", path = path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record at {location}: {reason}")]
    MalformedRecord { location: String, reason: String },
    #[error("failed to serialize terminology table: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to write terminology table: {0}")]
    FileWrite(std::io::Error),
}

pub type TerminologyResult<T> = std::result::Result<T, TerminologyError>;
