//! Error types for the checking engine.

use thiserror::Error;

/// Configuration-level failures. Reported before any checker runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("Unknown document part: {0}")]
    UnknownDocumentType(String),

    #[error("Document is empty")]
    EmptyDocument,

    #[error("Document has no '{0}' page; cannot locate the main content")]
    MissingContents(String),

    #[error("Invalid abbreviation alphabet '{0}'")]
    InvalidAlphabet(String),

    #[error("Could not open document: {0}")]
    Open(#[from] HostError),
}

/// Failure reported by the Document Access Interface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed document snapshot: {0}")]
    Malformed(String),

    #[error("Table {table} is not available")]
    NoSuchTable { table: usize },

    #[error("Row {row} of table {table} is not accessible: {reason}")]
    RowAccess {
        table: usize,
        row: usize,
        reason: String,
    },

    #[error("Cells of table {table} are not accessible: {reason}")]
    CellAccess { table: usize, reason: String },

    #[error("Page setup is not accessible: {0}")]
    PageSetup(String),
}

/// Failure of a single grammar provider request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Unable to reach grammar service (status: {0})")]
    Status(u16),

    #[error("Unable to reach grammar service: {0}")]
    Transport(String),

    #[error("Unreadable grammar service response: {0}")]
    Decode(String),
}
