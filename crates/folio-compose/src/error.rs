//! Error types for engine operations.
//!
//! Stale block ids and out-of-range indices are *not* errors; they are
//! no-ops. The only failures here are addressing a document the engine
//! doesn't hold and persistence failures passed through from the store.

use thiserror::Error;

use folio_store::StoreError;
use folio_types::DocumentId;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No open session for this document.
    #[error("document not open: {0:?}")]
    UnknownDocument(DocumentId),

    /// The store has no document with this id.
    #[error("document not found in store: {0:?}")]
    NotStored(DocumentId),

    /// Save or load failed. In-memory state is unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
