//! Error types for persistence and import.

use thiserror::Error;

use folio_types::{BlockId, Collection};

/// Errors from a [`DocumentStore`](crate::DocumentStore) backend.
///
/// A failed save never touches the caller's in-memory document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite backend failure (locked file, disk full, bad schema).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored bytes couldn't be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the write (quota, read-only, closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored body failed validation on the way back in.
    #[error("stored document is invalid: {0}")]
    Invalid(#[from] ImportError),
}

/// Validation errors for imported documents. The import is aborted; nothing is written.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object")]
    NotAnObject,

    /// A required top-level field is absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// Two blocks in one collection share an id.
    #[error("duplicate block {id} in {collection}")]
    DuplicateBlock { collection: Collection, id: BlockId },
}
