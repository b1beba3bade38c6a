//! In-memory store for tests and ephemeral sessions.
//!
//! Holds serialized JSON rather than live `Document`s so a load always returns
//! an independent copy, exactly like a real key-value backend.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use folio_types::{Document, DocumentId};

use crate::codec;
use crate::error::StoreError;
use crate::{DocumentStore, DocumentSummary};

struct Stored {
    body: String,
    summary: DocumentSummary,
}

#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<DocumentId, Stored>,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with [`StoreError::Unavailable`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is read-only".into()));
        }
        let body = codec::export_json(doc)?;
        self.docs.insert(
            doc.id,
            Stored {
                body,
                summary: DocumentSummary::of(doc),
            },
        );
        Ok(())
    }

    fn load(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let Some(entry) = self.docs.get(id) else {
            return Ok(None);
        };
        Ok(Some(codec::import_json(&entry.body)?))
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        let mut out: Vec<DocumentSummary> = self.docs.iter().map(|e| e.summary.clone()).collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is read-only".into()));
        }
        Ok(self.docs.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{Block, BlockKind};

    #[test]
    fn test_save_load_returns_independent_copy() {
        let store = MemoryStore::new();
        let mut doc = Document::new("resume");
        doc.main.push(Block::new(BlockKind::Text, "Intro", 0));
        store.save(&doc).unwrap();

        doc.main.clear();
        let loaded = store.load(&doc.id).unwrap().unwrap();
        assert_eq!(loaded.main.len(), 1);
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(&DocumentId::new()).unwrap().is_none());
    }

    #[test]
    fn test_read_only_rejects_save() {
        let store = MemoryStore::new();
        store.set_read_only(true);
        let err = store.save(&Document::new("x")).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_and_delete() {
        let store = MemoryStore::new();
        let a = Document::new("a");
        let b = Document::new("b");
        store.save(&a).unwrap();
        store.save(&b).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
