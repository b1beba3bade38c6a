//! Layout router: partition merged blocks into the named slots of a mode.
//!
//! The region table itself lives on [`LayoutMode::slot_for`]; this module
//! only applies it and assembles the render view.

use indexmap::IndexMap;
use serde::Serialize;

use folio_types::{
    Block, Collection, Document, GlobalStyle, LayoutMode, ResolvedStyle, Slot, Spacing,
};

use crate::merge::merge_blocks;
use crate::overlay::Overlay;

/// A merged block with its computed style, ready to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBlock {
    pub block: Block,
    pub style: ResolvedStyle,
    /// Which stored collection the block came from.
    pub collection: Collection,
}

/// Slot name → blocks, in the mode's slot order.
pub type Regions = IndexMap<Slot, Vec<RenderBlock>>;

/// Everything a renderer needs for one document in one mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub mode: LayoutMode,
    pub spacing: Spacing,
    pub styles: GlobalStyle,
    pub regions: Regions,
}

impl RenderView {
    pub fn slot(&self, slot: Slot) -> &[RenderBlock] {
        self.regions.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total blocks across every slot.
    pub fn block_count(&self) -> usize {
        self.regions.values().map(Vec::len).sum()
    }
}

/// Partition sorted blocks by region. Every slot of `mode` is present.
pub fn route(
    blocks: Vec<Block>,
    mode: LayoutMode,
    collection: Collection,
    styles: &GlobalStyle,
) -> Regions {
    let mut regions: Regions = mode.slots().iter().map(|s| (*s, Vec::new())).collect();

    for block in blocks {
        let Some(slot) = mode.slot_for(block.region) else {
            tracing::trace!(
                block = %block.id,
                region = %block.region,
                mode = %mode,
                "region has no slot in mode, excluded"
            );
            continue;
        };
        let style = block.style.resolve(styles);
        if let Some(bucket) = regions.get_mut(&slot) {
            bucket.push(RenderBlock {
                block,
                style,
                collection,
            });
        }
    }
    regions
}

/// Merge both collections with `overlay` and route them for `mode`.
///
/// Main blocks are routed by region. Secondary blocks are appended to
/// `layout.secondary_slot` when the mode has that slot, and omitted otherwise.
/// Pure: the document and overlay are only read.
pub fn resolve_for_render(doc: &Document, overlay: &Overlay, mode: LayoutMode) -> RenderView {
    let main = merge_blocks(&doc.main, &overlay.main);
    let mut regions = route(main, mode, Collection::Main, &doc.styles);

    let secondary = merge_blocks(&doc.secondary, &overlay.secondary);
    match doc.layout.secondary_slot {
        Some(slot) if mode.has_slot(slot) => {
            if let Some(bucket) = regions.get_mut(&slot) {
                bucket.extend(secondary.into_iter().map(|block| RenderBlock {
                    style: block.style.resolve(&doc.styles),
                    block,
                    collection: Collection::Secondary,
                }));
            }
        }
        Some(slot) if !secondary.is_empty() => {
            tracing::debug!(
                document = %doc.id,
                slot = %slot,
                mode = %mode,
                "secondary slot not in mode, widgets omitted"
            );
        }
        _ => {}
    }

    RenderView {
        mode,
        spacing: doc.layout.spacing,
        styles: doc.styles.clone(),
        regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{BlockKind, Region};
    use pretty_assertions::assert_eq;

    fn block(title: &str, order: i64, region: Region) -> Block {
        let mut b = Block::new(BlockKind::Text, title, order);
        b.region = region;
        b
    }

    fn titles(blocks: &[RenderBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.block.title.as_str()).collect()
    }

    #[test]
    fn test_two_column_routing() {
        let blocks = vec![
            block("a", 0, Region::MAIN),
            block("b", 1, Region::SIDEBAR),
            block("c", 2, Region::FOOTER),
            block("d", 3, Region::MAIN),
        ];
        let regions = route(
            blocks,
            LayoutMode::TwoColumn,
            Collection::Main,
            &GlobalStyle::default(),
        );
        let keys: Vec<Slot> = regions.keys().copied().collect();
        assert_eq!(keys, vec![Slot::Left, Slot::Right]);
        assert_eq!(titles(&regions[&Slot::Left]), vec!["a", "d"]);
        assert_eq!(titles(&regions[&Slot::Right]), vec!["b"]);
    }

    #[test]
    fn test_empty_slots_are_present() {
        let regions = route(
            Vec::new(),
            LayoutMode::HeaderFooter,
            Collection::Main,
            &GlobalStyle::default(),
        );
        assert_eq!(regions.len(), 3);
        assert!(regions.values().all(Vec::is_empty));
    }

    #[test]
    fn test_default_mode_takes_every_region() {
        let blocks = (0..4u8).map(|r| block(&r.to_string(), r as i64, Region(r))).collect();
        let regions = route(blocks, LayoutMode::Default, Collection::Main, &GlobalStyle::default());
        assert_eq!(regions[&Slot::Content].len(), 4);
    }

    #[test]
    fn test_resolved_style_fills_globals() {
        let mut b = block("a", 0, Region::MAIN);
        b.style.padding = Some(4);
        let styles = GlobalStyle::default();
        let regions = route(vec![b], LayoutMode::SingleColumn, Collection::Main, &styles);
        let style = &regions[&Slot::Main][0].style;
        assert_eq!(style.padding, 4);
        assert_eq!(style.background, styles.palette.background);
    }

    #[test]
    fn test_secondary_placed_in_configured_slot() {
        let mut doc = Document::new("d");
        doc.main.push(block("section", 0, Region::MAIN));
        doc.secondary.push(block("widget", 0, Region::SIDEBAR));
        doc.layout.secondary_slot = Some(Slot::Sidebar);

        let view = resolve_for_render(&doc, &Overlay::new(), LayoutMode::Sidebar);
        assert_eq!(titles(view.slot(Slot::Sidebar)), vec!["widget"]);
        assert_eq!(view.slot(Slot::Sidebar)[0].collection, Collection::Secondary);
        assert_eq!(titles(view.slot(Slot::Content)), vec!["section"]);

        // Slot missing in this mode: widgets are left out.
        let view = resolve_for_render(&doc, &Overlay::new(), LayoutMode::SingleColumn);
        assert_eq!(view.block_count(), 1);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut doc = Document::new("d");
        doc.main.push(block("a", 1, Region::MAIN));
        doc.main.push(block("b", 0, Region::MAIN));
        let overlay = Overlay::new();
        let before = doc.clone();

        let first = resolve_for_render(&doc, &overlay, LayoutMode::Default);
        let second = resolve_for_render(&doc, &overlay, LayoutMode::Default);
        assert_eq!(first, second);
        assert_eq!(doc, before);
        assert_eq!(titles(first.slot(Slot::Content)), vec!["b", "a"]);
    }
}
