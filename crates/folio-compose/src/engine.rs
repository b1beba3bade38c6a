//! The engine facade: open sessions keyed by document id.
//!
//! Every operation takes the document id first and returns the resulting
//! document. Apart from persistence, addressing a document that isn't open
//! is the only error: stale block ids and bad indices fall through as no-ops
//! and the unchanged document comes back.

use std::collections::HashMap;

use folio_store::DocumentStore;
use folio_types::{
    BlockId, BlockPatch, BlockSeed, Collection, Document, DocumentId, GlobalStylePatch,
    LayoutMode, LayoutPatch,
};

use crate::Result;
use crate::error::EngineError;
use crate::layout::RenderView;
use crate::overlay::Overlay;
use crate::session::{DeletionOutcome, PendingDeletion, Session, SessionConfig};

/// Result of an undo or redo.
#[derive(Debug, PartialEq)]
pub enum HistoryOutcome<'a> {
    Applied(&'a Document),
    /// Nothing to step to; the document is unchanged.
    NoOp(&'a Document),
}

impl<'a> HistoryOutcome<'a> {
    pub fn document(&self) -> &'a Document {
        match self {
            HistoryOutcome::Applied(d) | HistoryOutcome::NoOp(d) => d,
        }
    }

    pub fn applied(&self) -> bool {
        matches!(self, HistoryOutcome::Applied(_))
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    sessions: HashMap<DocumentId, Session>,
    config: SessionConfig,
}

impl Engine {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a fresh document with default layout and style, and open it.
    pub fn create_document(&mut self) -> &Document {
        self.open(Document::default())
    }

    /// Open `doc` in a new session, replacing any session with the same id.
    pub fn open(&mut self, doc: Document) -> &Document {
        let id = doc.id;
        let session = Session::new(doc, &self.config);
        if self.sessions.insert(id, session).is_some() {
            tracing::debug!(document = %id, "replaced open session");
        }
        self.sessions[&id].document()
    }

    /// Discard a session and hand back its document.
    pub fn close(&mut self, id: &DocumentId) -> Option<Document> {
        self.sessions.remove(id).map(|s| s.document().clone())
    }

    pub fn is_open(&self, id: &DocumentId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn open_documents(&self) -> impl Iterator<Item = &Document> {
        self.sessions.values().map(Session::document)
    }

    pub fn session(&self, id: &DocumentId) -> Result<&Session> {
        self.sessions
            .get(id)
            .ok_or(EngineError::UnknownDocument(*id))
    }

    pub fn session_mut(&mut self, id: &DocumentId) -> Result<&mut Session> {
        self.sessions
            .get_mut(id)
            .ok_or(EngineError::UnknownDocument(*id))
    }

    pub fn document(&self, id: &DocumentId) -> Result<&Document> {
        self.session(id).map(Session::document)
    }

    fn edit(&mut self, id: &DocumentId, f: impl FnOnce(&mut Session)) -> Result<&Document> {
        f(self.session_mut(id)?);
        self.document(id)
    }

    pub fn apply_patch(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        block: &BlockId,
        patch: &BlockPatch,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.update_block(collection, block, patch);
        })
    }

    pub fn add_block(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        seed: &BlockSeed,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.add_block(collection, seed);
        })
    }

    pub fn remove_block(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        block: &BlockId,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.remove_block(collection, block);
        })
    }

    pub fn move_block(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        source: usize,
        destination: Option<usize>,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.move_block(collection, source, destination);
        })
    }

    pub fn toggle_visibility(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        block: &BlockId,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.toggle_visibility(collection, block);
        })
    }

    pub fn toggle_collapsible(
        &mut self,
        id: &DocumentId,
        collection: Collection,
        block: &BlockId,
    ) -> Result<&Document> {
        self.edit(id, |s| {
            s.toggle_collapsible(collection, block);
        })
    }

    pub fn set_global_style(&mut self, id: &DocumentId, patch: &GlobalStylePatch) -> Result<&Document> {
        self.edit(id, |s| {
            s.set_global_style(patch);
        })
    }

    pub fn set_layout(&mut self, id: &DocumentId, patch: &LayoutPatch) -> Result<&Document> {
        self.edit(id, |s| {
            s.set_layout(patch);
        })
    }

    pub fn commit_overlay(&mut self, id: &DocumentId, overlay: &Overlay) -> Result<&Document> {
        self.edit(id, |s| {
            s.commit_overlay(overlay);
        })
    }

    pub fn rename(&mut self, id: &DocumentId, name: &str) -> Result<&Document> {
        self.edit(id, |s| {
            s.rename(name);
        })
    }

    pub fn undo(&mut self, id: &DocumentId) -> Result<HistoryOutcome<'_>> {
        let session = self.session_mut(id)?;
        Ok(if session.undo() {
            HistoryOutcome::Applied(session.document())
        } else {
            HistoryOutcome::NoOp(session.document())
        })
    }

    pub fn redo(&mut self, id: &DocumentId) -> Result<HistoryOutcome<'_>> {
        let session = self.session_mut(id)?;
        Ok(if session.redo() {
            HistoryOutcome::Applied(session.document())
        } else {
            HistoryOutcome::NoOp(session.document())
        })
    }

    pub fn request_deletion(
        &self,
        id: &DocumentId,
        collection: Collection,
        block: &BlockId,
    ) -> Result<Option<PendingDeletion>> {
        Ok(self.session(id)?.request_deletion(collection, block))
    }

    pub fn resolve_deletion(
        &mut self,
        pending: PendingDeletion,
        granted: bool,
    ) -> Result<DeletionOutcome> {
        let session = self.session_mut(&pending.document())?;
        Ok(session.resolve_deletion(pending, granted))
    }

    pub fn render(&self, id: &DocumentId, overlay: &Overlay, mode: LayoutMode) -> Result<RenderView> {
        Ok(self.session(id)?.render(overlay, mode))
    }

    /// Persist the current document. The session stays usable if this fails.
    pub fn save(&self, id: &DocumentId, store: &dyn DocumentStore) -> Result<()> {
        let doc = self.document(id)?;
        store.save(doc)?;
        tracing::info!(document = %id, name = %doc.name, "saved");
        Ok(())
    }

    /// Load a stored document into a fresh session (history starts empty).
    pub fn load(&mut self, id: &DocumentId, store: &dyn DocumentStore) -> Result<&Document> {
        let doc = store.load(id)?.ok_or(EngineError::NotStored(*id))?;
        tracing::info!(document = %id, name = %doc.name, "loaded");
        Ok(self.open(doc))
    }
}
