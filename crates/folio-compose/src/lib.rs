//! Composition engine for Folio documents.
//!
//! Takes the plain data in `folio-types` and adds the behaviour: override
//! merge, layout routing, reordering, and undo/redo over whole-document
//! snapshots.
//!
//! # Read path
//!
//! ```text
//! Document + Overlay
//!     │  merge_blocks      (per collection: synthesize, override, hide, sort)
//!     ▼
//! Vec<Block>
//!     │  route             (region → slot table of the LayoutMode)
//!     ▼
//! RenderView { regions: slot → [RenderBlock] }
//!     │  render_view       (decode BlockContent, dispatch to BlockRenderer)
//!     ▼
//! caller's renderer
//! ```
//!
//! # Write path
//!
//! [`Engine`] owns one [`Session`] per open document. A session applies each
//! mutation to a clone, swaps it in only if something changed, and records the
//! pre-state in its [`History`]. Drag state is transient and never recorded;
//! deletion goes through [`PendingDeletion`] so a declined prompt leaves no
//! trace.

pub mod catalog;
pub mod content;
mod engine;
mod error;
pub mod history;
pub mod layout;
pub mod merge;
pub mod overlay;
pub mod reorder;
mod session;

pub use catalog::{BuiltinCatalog, SeedSource};
pub use content::{BlockContent, BlockRenderer, ContentError, RenderStats, render_view};
pub use engine::{Engine, HistoryOutcome};
pub use error::EngineError;
pub use history::{ActionKind, History, HistoryEntry};
pub use layout::{RenderBlock, RenderView, Regions, resolve_for_render, route};
pub use merge::{commit_overrides, merge_blocks};
pub use overlay::{BlockOverride, Overlay};
pub use session::{Confirm, DeletionOutcome, PendingDeletion, Session, SessionConfig};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{BlockKind, Collection, LayoutMode, LayoutPatch, Region, Slot};

    #[test]
    fn test_edit_then_render() {
        let mut engine = Engine::default();
        let id = engine.create_document().id;
        let catalog = BuiltinCatalog;

        for kind in [BlockKind::Hero, BlockKind::Text, BlockKind::Skills] {
            let seed = catalog.seed(kind).unwrap();
            engine.add_block(&id, Collection::Main, &seed).unwrap();
        }
        engine
            .set_layout(
                &id,
                &LayoutPatch {
                    mode: Some(LayoutMode::HeaderFooter),
                    ..Default::default()
                },
            )
            .unwrap();

        let doc = engine.document(&id).unwrap();
        assert_eq!(doc.main[0].region, Region::HEADER);
        let view = resolve_for_render(doc, &Overlay::new(), doc.layout.mode);

        assert_eq!(view.slot(Slot::Header).len(), 1);
        assert_eq!(view.slot(Slot::Body).len(), 1);
        // Skills seeds into the sidebar region, which header_footer doesn't show.
        assert_eq!(view.block_count(), 2);
    }
}
