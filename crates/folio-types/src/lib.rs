//! Shared identity, block, layout, and style types for Folio.
//!
//! This crate is the leaf of the workspace: plain data with serde support and
//! **no internal folio dependencies**. The engine in `folio-compose` and the
//! persistence layer in `folio-store` both build on it.
//!
//! # Entity Overview
//!
//! ```text
//! Document (DocumentId)
//!     ├── main: Vec<Block>        ← sections ("mainSections")
//!     ├── secondary: Vec<Block>   ← widgets ("sidebarWidgets")
//!     ├── layout: LayoutSettings  ← mode, spacing, secondary slot
//!     └── styles: GlobalStyle     ← palette, typography, base spacing
//!
//! Block (BlockId)
//!     ├── kind: BlockKind         ← closed set + Unknown fallback
//!     ├── content: JSON payload   ← shape depends on kind
//!     ├── style: StyleOverrides   ← sparse, merged key-wise
//!     └── order / visible / region
//! ```

pub mod block;
pub mod document;
pub mod ids;
pub mod layout;
pub mod style;

pub use block::{Block, BlockKind, BlockPatch, BlockSeed, Collection, Region};
pub use document::Document;
pub use ids::{BlockId, DocumentId, HistoryEntryId, PrefixError, resolve_document_prefix};
pub use layout::{LayoutMode, LayoutPatch, LayoutSettings, Slot, Spacing};
pub use style::{
    Alignment, GlobalStyle, GlobalStylePatch, Palette, ResolvedStyle, StyleOverrides, Typography,
    WidthClass,
};

/// Current time as Unix milliseconds. Used by constructors throughout the crate.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
