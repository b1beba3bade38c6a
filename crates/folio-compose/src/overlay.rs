//! Customization overlays: sparse per-block overrides keyed by block id.
//!
//! An overlay never owns blocks. It is layered onto a document at read time
//! by [`merge_blocks`](crate::merge::merge_blocks), or written into the
//! document with [`commit_overrides`](crate::merge::commit_overrides).
//! Entries keep insertion order so overlay-introduced blocks merge in a
//! deterministic sequence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use folio_types::{Block, BlockId, BlockKind, Collection, Region, StyleOverrides};

/// Partial block fields. `None` means "don't override".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockOverride {
    /// Replaces the block title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replaces the block kind. Unrecognized names resolve to `BlockKind::Unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Merged key-wise over the block's own overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleOverrides>,
    /// Replaces the payload; mostly useful for overlay-introduced blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl BlockOverride {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn style(mut self, style: StyleOverrides) -> Self {
        self.style = Some(style);
        self
    }

    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Write every defined field into `block`. Returns true if anything changed.
    pub fn apply_to(&self, block: &mut Block) -> bool {
        let before = block.clone();
        if let Some(name) = &self.name {
            block.title = name.clone();
        }
        if let Some(component) = &self.component {
            let kind = BlockKind::from_component(component);
            if !kind.is_known() {
                tracing::warn!(
                    block = %block.id,
                    component = %component,
                    "overlay names an unknown component"
                );
            }
            block.kind = kind;
        }
        if let Some(visible) = self.visible {
            block.visible = visible;
        }
        if let Some(order) = self.order {
            block.order = order;
        }
        if let Some(region) = self.region {
            block.region = region;
        }
        if let Some(style) = &self.style {
            block.style.merge(style);
        }
        if let Some(content) = &self.content {
            block.content = content.clone();
        }
        *block != before
    }

    /// Build a block that exists only in the overlay.
    ///
    /// Defaults: `custom_text` kind, empty title, main region, visible. Both
    /// timestamps are set to `stamp`. The overlay's own fields are applied on
    /// top by the caller.
    pub(crate) fn synthesize(id: BlockId, order: i64, stamp: u64) -> Block {
        let mut block = Block::new(BlockKind::CustomText, "", order);
        block.id = id;
        block.created_at = stamp;
        block.updated_at = stamp;
        block
    }
}

/// Overrides for both collections of one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    #[serde(default, rename = "mainSections")]
    pub main: IndexMap<BlockId, BlockOverride>,
    #[serde(default, rename = "sidebarWidgets")]
    pub secondary: IndexMap<BlockId, BlockOverride>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.secondary.is_empty()
    }

    pub fn for_collection(&self, collection: Collection) -> &IndexMap<BlockId, BlockOverride> {
        match collection {
            Collection::Main => &self.main,
            Collection::Secondary => &self.secondary,
        }
    }

    /// Add or replace the override for one block.
    pub fn set(&mut self, collection: Collection, id: BlockId, ov: BlockOverride) -> &mut Self {
        match collection {
            Collection::Main => self.main.insert(id, ov),
            Collection::Secondary => self.secondary.insert(id, ov),
        };
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, collection: Collection, id: BlockId, ov: BlockOverride) -> Self {
        self.set(collection, id, ov);
        self
    }
}
