//! One open document: its live state, history, and transient drag state.
//!
//! Every mutation runs on a clone of the document and is swapped in only when
//! it changed something, so a failed or no-op operation never leaves a
//! half-applied document or a spurious history entry behind.

use std::mem;

use serde::Deserialize;

use folio_types::{
    Block, BlockId, BlockPatch, BlockSeed, Collection, Document, DocumentId, GlobalStylePatch,
    LayoutMode, LayoutPatch,
};

use crate::history::{ActionKind, DEFAULT_HISTORY_LIMIT, History};
use crate::layout::{RenderView, resolve_for_render};
use crate::merge::commit_overrides;
use crate::overlay::Overlay;
use crate::reorder;

/// Per-session tuning.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Max undoable actions; 0 means unbounded.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Asks a human (or a policy) whether a destructive action may proceed.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A deletion waiting for confirmation. Consumed by `resolve_deletion`.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingDeletion {
    document: DocumentId,
    collection: Collection,
    block: BlockId,
    title: String,
}

impl PendingDeletion {
    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Question to show the user.
    pub fn prompt(&self) -> String {
        let noun = match self.collection {
            Collection::Main => "section",
            Collection::Secondary => "widget",
        };
        if self.title.is_empty() {
            format!("Delete this {noun}?")
        } else {
            format!("Delete {noun} \"{}\"?", self.title)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletionOutcome {
    Removed,
    Declined,
    /// The block was already gone when the answer arrived.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DragState {
    collection: Collection,
    source: usize,
}

/// Live editing state for one document.
#[derive(Debug)]
pub struct Session {
    document: Document,
    history: History,
    drag: Option<DragState>,
}

impl Session {
    pub fn new(document: Document, config: &SessionConfig) -> Self {
        let history = History::new(&document, config.history_limit);
        Self {
            document,
            history,
            drag: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply `f` to a copy of the document; keep and record it if it changed.
    fn mutate(&mut self, action: ActionKind, f: impl FnOnce(&mut Document) -> bool) -> bool {
        let mut next = self.document.clone();
        if !f(&mut next) || next.content_eq(&self.document) {
            tracing::debug!(document = %self.document.id, action = %action, "no change");
            return false;
        }
        next.updated_at = folio_types::now_millis();
        let pre = mem::replace(&mut self.document, next);
        self.history.record(action, pre);
        true
    }

    pub fn rename(&mut self, name: &str) -> bool {
        self.mutate(ActionKind::Rename, |doc| {
            doc.name = name.to_string();
            true
        })
    }

    /// Append a block built from `seed`. Returns its id.
    pub fn add_block(&mut self, collection: Collection, seed: &BlockSeed) -> BlockId {
        let block = Block::from_seed(seed, self.document.next_order(collection));
        let id = block.id;
        self.mutate(ActionKind::AddBlock, |doc| {
            doc.blocks_mut(collection).push(block);
            true
        });
        id
    }

    pub fn update_block(&mut self, collection: Collection, id: &BlockId, patch: &BlockPatch) -> bool {
        self.with_block(ActionKind::UpdateBlock, collection, id, |block| {
            block.apply_patch(patch)
        })
    }

    /// Remove a block outright. Siblings keep their order values.
    pub fn remove_block(&mut self, collection: Collection, id: &BlockId) -> bool {
        self.mutate(ActionKind::RemoveBlock, |doc| {
            let blocks = doc.blocks_mut(collection);
            let before = blocks.len();
            blocks.retain(|b| b.id != *id);
            blocks.len() != before
        })
    }

    pub fn toggle_visibility(&mut self, collection: Collection, id: &BlockId) -> bool {
        self.with_block(ActionKind::ToggleVisibility, collection, id, |block| {
            block.visible = !block.visible;
            true
        })
    }

    /// Widgets only; sections have no collapsed state.
    pub fn toggle_collapsible(&mut self, collection: Collection, id: &BlockId) -> bool {
        if collection != Collection::Secondary {
            tracing::debug!(block = %id, "collapsible applies to widgets only");
            return false;
        }
        self.with_block(ActionKind::ToggleCollapsible, collection, id, |block| {
            block.collapsible = !block.collapsible;
            true
        })
    }

    fn with_block(
        &mut self,
        action: ActionKind,
        collection: Collection,
        id: &BlockId,
        f: impl FnOnce(&mut Block) -> bool,
    ) -> bool {
        if self.document.block(collection, id).is_none() {
            tracing::debug!(block = %id, collection = %collection, action = %action, "unknown block");
            return false;
        }
        self.mutate(action, |doc| match doc.block_mut(collection, id) {
            Some(block) => {
                let changed = f(block);
                if changed {
                    block.updated_at = folio_types::now_millis();
                }
                changed
            }
            None => false,
        })
    }

    /// Move by rendered index. See [`reorder::move_block`].
    pub fn move_block(
        &mut self,
        collection: Collection,
        source: usize,
        destination: Option<usize>,
    ) -> bool {
        self.mutate(ActionKind::MoveBlock, |doc| {
            reorder::move_block(doc.blocks_mut(collection), source, destination)
        })
    }

    pub fn set_global_style(&mut self, patch: &GlobalStylePatch) -> bool {
        self.mutate(ActionKind::SetGlobalStyle, |doc| {
            doc.styles.apply(patch);
            true
        })
    }

    pub fn set_layout(&mut self, patch: &LayoutPatch) -> bool {
        self.mutate(ActionKind::SetLayout, |doc| {
            doc.layout.apply(patch);
            true
        })
    }

    /// Write an overlay into the stored document as one undoable action.
    pub fn commit_overlay(&mut self, overlay: &Overlay) -> bool {
        self.mutate(ActionKind::CommitOverlay, |doc| {
            let main = commit_overrides(&mut doc.main, &overlay.main);
            let secondary = commit_overrides(&mut doc.secondary, &overlay.secondary);
            main || secondary
        })
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.document) {
            Some(doc) => {
                self.document = doc;
                self.drag = None;
                true
            }
            None => {
                tracing::debug!(document = %self.document.id, "nothing to undo");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(doc) => {
                self.document = doc;
                self.drag = None;
                true
            }
            None => {
                tracing::debug!(document = %self.document.id, "nothing to redo");
                false
            }
        }
    }

    // ── Drag ────────────────────────────────────────────────────────────

    /// Start dragging the block at rendered index `source`. Records nothing.
    pub fn begin_drag(&mut self, collection: Collection, source: usize) {
        self.drag = Some(DragState { collection, source });
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Finish the drag. `None` means it was dropped outside any target.
    pub fn end_drag(&mut self, destination: Option<usize>) -> bool {
        let Some(drag) = self.drag.take() else {
            tracing::debug!("drop without an active drag");
            return false;
        };
        self.move_block(drag.collection, drag.source, destination)
    }

    // ── Two-phase deletion ─────────────────────────────────────────────

    /// Stage a deletion. `None` if the block doesn't exist.
    pub fn request_deletion(&self, collection: Collection, id: &BlockId) -> Option<PendingDeletion> {
        let block = self.document.block(collection, id)?;
        Some(PendingDeletion {
            document: self.document.id,
            collection,
            block: block.id,
            title: block.title.clone(),
        })
    }

    pub fn resolve_deletion(&mut self, pending: PendingDeletion, granted: bool) -> DeletionOutcome {
        if !granted {
            tracing::debug!(block = %pending.block, "deletion declined");
            return DeletionOutcome::Declined;
        }
        if self.remove_block(pending.collection, &pending.block) {
            DeletionOutcome::Removed
        } else {
            DeletionOutcome::Stale
        }
    }

    /// Request, ask, and resolve in one call.
    pub fn remove_block_confirmed(
        &mut self,
        collection: Collection,
        id: &BlockId,
        confirm: &mut dyn Confirm,
    ) -> Option<DeletionOutcome> {
        let pending = self.request_deletion(collection, id)?;
        let granted = confirm.confirm(&pending.prompt());
        Some(self.resolve_deletion(pending, granted))
    }

    pub fn render(&self, overlay: &Overlay, mode: LayoutMode) -> RenderView {
        resolve_for_render(&self.document, overlay, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::BlockOverride;
    use folio_types::BlockKind;
    use pretty_assertions::assert_eq;

    fn session_with(titles: &[&str]) -> Session {
        let mut s = Session::new(Document::new("test"), &SessionConfig::default());
        for t in titles {
            s.add_block(Collection::Main, &BlockSeed::new(BlockKind::Text, *t));
        }
        s
    }

    fn titles(s: &Session, c: Collection) -> Vec<String> {
        s.document()
            .ordered(c)
            .iter()
            .map(|b| b.title.clone())
            .collect()
    }

    #[test]
    fn test_add_appends_with_next_order() {
        let s = session_with(&["A", "B"]);
        let orders: Vec<i64> = s.document().main.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn test_unknown_block_is_noop_without_history() {
        let mut s = session_with(&["A"]);
        let len = s.history().len();
        let ghost = BlockId::new();
        assert!(!s.toggle_visibility(Collection::Main, &ghost));
        assert!(!s.remove_block(Collection::Main, &ghost));
        assert!(!s.update_block(Collection::Main, &ghost, &BlockPatch::default().title("x")));
        assert_eq!(s.history().len(), len);
    }

    #[test]
    fn test_remove_does_not_renumber() {
        let mut s = session_with(&["A", "B", "C"]);
        let b = s.document().main[1].id;
        assert!(s.remove_block(Collection::Main, &b));
        let orders: Vec<i64> = s.document().main.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 2]);
    }

    #[test]
    fn test_toggle_collapsible_only_on_widgets() {
        let mut s = session_with(&["A"]);
        let a = s.document().main[0].id;
        assert!(!s.toggle_collapsible(Collection::Main, &a));

        let w = s.add_block(Collection::Secondary, &BlockSeed::new(BlockKind::Contact, "Contact"));
        assert!(s.toggle_collapsible(Collection::Secondary, &w));
        assert!(s.document().secondary[0].collapsible);
    }

    #[test]
    fn test_undo_restores_pre_state_and_redo_post_state() {
        let mut s = session_with(&["A", "B", "C"]);
        let before = s.document().clone();
        assert!(s.move_block(Collection::Main, 0, Some(2)));
        let after = s.document().clone();

        assert!(s.undo());
        assert_eq!(s.document(), &before);
        assert!(s.redo());
        assert_eq!(s.document(), &after);
    }

    #[test]
    fn test_drag_records_only_the_drop() {
        let mut s = session_with(&["A", "B", "C"]);
        let len = s.history().len();

        s.begin_drag(Collection::Main, 0);
        assert!(s.is_dragging());
        assert_eq!(s.history().len(), len);
        s.cancel_drag();
        assert!(!s.is_dragging());
        assert_eq!(s.history().len(), len);

        s.begin_drag(Collection::Main, 0);
        assert!(!s.end_drag(None));
        assert_eq!(s.history().len(), len);

        s.begin_drag(Collection::Main, 0);
        assert!(s.end_drag(Some(2)));
        assert_eq!(s.history().len(), len + 1);
        assert_eq!(titles(&s, Collection::Main), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_declined_deletion_changes_nothing() {
        let mut s = session_with(&["A", "B"]);
        let b = s.document().main[1].id;
        let (doc, len) = (s.document().clone(), s.history().len());

        let pending = s.request_deletion(Collection::Main, &b).unwrap();
        assert_eq!(pending.prompt(), "Delete section \"B\"?");
        assert_eq!(s.resolve_deletion(pending, false), DeletionOutcome::Declined);
        assert_eq!(s.document(), &doc);
        assert_eq!(s.history().len(), len);
    }

    #[test]
    fn test_stale_deletion() {
        let mut s = session_with(&["A"]);
        let a = s.document().main[0].id;
        let pending = s.request_deletion(Collection::Main, &a).unwrap();
        s.remove_block(Collection::Main, &a);
        assert_eq!(s.resolve_deletion(pending, true), DeletionOutcome::Stale);
    }

    #[test]
    fn test_confirmed_removal_with_closure() {
        let mut s = session_with(&["A"]);
        let a = s.document().main[0].id;
        let mut asked = Vec::new();
        let mut yes = |prompt: &str| {
            asked.push(prompt.to_string());
            true
        };
        let outcome = s.remove_block_confirmed(Collection::Main, &a, &mut yes);
        assert_eq!(outcome, Some(DeletionOutcome::Removed));
        assert_eq!(asked.len(), 1);
        assert!(s.document().main.is_empty());
    }

    #[test]
    fn test_commit_overlay_is_one_undoable_action() {
        let mut s = session_with(&["A", "B"]);
        let a = s.document().main[0].id;
        let before = s.document().clone();
        let overlay = Overlay::new().with(Collection::Main, a, BlockOverride::default().name("Intro"));

        assert!(s.commit_overlay(&overlay));
        assert_eq!(s.document().main[0].title, "Intro");
        assert!(!s.commit_overlay(&overlay));

        assert!(s.undo());
        assert_eq!(s.document(), &before);
    }

    #[test]
    fn test_config_defaults() {
        let cfg: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.history_limit, DEFAULT_HISTORY_LIMIT);
    }
}
