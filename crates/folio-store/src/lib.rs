//! Persistence for Folio documents.
//!
//! The engine only sees the [`DocumentStore`] trait: save a whole document,
//! load it back by id. Two backends ship here:
//!
//! - [`MemoryStore`]: DashMap of serialized bodies, for tests and scratch sessions
//! - [`SqliteStore`]: one row per document, for the CLI
//!
//! [`codec`] holds the JSON import/export used by both backends and by file
//! import, including validation of required fields.

pub mod codec;
mod error;
mod memory;
mod sqlite;

pub use codec::{export_json, import_json};
pub use error::{ImportError, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use folio_types::{Document, DocumentId};

/// Listing row: enough to pick a document without loading it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    pub sections: usize,
    pub widgets: usize,
    pub updated_at: u64,
}

impl DocumentSummary {
    pub fn of(doc: &Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            sections: doc.main.len(),
            widgets: doc.secondary.len(),
            updated_at: doc.updated_at,
        }
    }
}

/// Opaque key-value persistence for whole documents.
///
/// Failures are surfaced to the caller; an in-memory session stays valid and
/// editable when a save fails.
pub trait DocumentStore {
    fn save(&self, doc: &Document) -> Result<(), StoreError>;

    /// `Ok(None)` when no document has that id.
    fn load(&self, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// All stored documents, most recently updated first.
    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError>;

    /// Returns whether a document was removed.
    fn delete(&self, id: &DocumentId) -> Result<bool, StoreError>;
}
