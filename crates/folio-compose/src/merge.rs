//! Override merge: layer an overlay onto a base block list.
//!
//! # Algorithm
//!
//! 1. Start from a copy of the base list.
//! 2. Append a synthesized block for every overlay entry whose id is not in
//!    the base, unless that entry explicitly sets `visible: false`.
//! 3. Apply each matching override field-wise (style merges key-wise).
//! 4. Drop blocks whose resolved `visible` is false.
//! 5. Stable-sort by `order`; equal orders keep working-list position.
//!
//! Neither input is mutated, and the same inputs always give the same output.

use std::collections::HashSet;

use indexmap::IndexMap;

use folio_types::{Block, BlockId};

use crate::overlay::BlockOverride;

/// Produce the render-ready list for one collection.
///
/// Overlay-only blocks carry zero timestamps; they have not been written yet.
pub fn merge_blocks(base: &[Block], overrides: &IndexMap<BlockId, BlockOverride>) -> Vec<Block> {
    let mut working = overlay_working_set(base, overrides, 0);

    for block in working.iter_mut() {
        if let Some(ov) = overrides.get(&block.id) {
            ov.apply_to(block);
        }
    }

    working.retain(|b| b.visible);
    // Vec::sort_by_key is stable; order values may repeat.
    working.sort_by_key(|b| b.order);
    working
}

/// Write an overlay into stored blocks. Returns true if anything changed.
///
/// Same field semantics as [`merge_blocks`], but nothing is dropped or
/// re-sorted: hidden blocks stay in storage and order values are kept as
/// given until the next reorder normalizes them. Overlay-only blocks are
/// stamped with the current time as they enter storage.
pub fn commit_overrides(
    blocks: &mut Vec<Block>,
    overrides: &IndexMap<BlockId, BlockOverride>,
) -> bool {
    let mut working = overlay_working_set(blocks, overrides, folio_types::now_millis());
    let mut changed = working.len() != blocks.len();

    for block in working.iter_mut() {
        if let Some(ov) = overrides.get(&block.id) {
            changed |= ov.apply_to(block);
        }
    }

    if changed {
        *blocks = working;
    }
    changed
}

/// Base blocks plus synthesized overlay-only blocks (steps 1 and 2).
fn overlay_working_set(
    base: &[Block],
    overrides: &IndexMap<BlockId, BlockOverride>,
    stamp: u64,
) -> Vec<Block> {
    let base_ids: HashSet<BlockId> = base.iter().map(|b| b.id).collect();
    let mut working = base.to_vec();

    for (id, ov) in overrides {
        if base_ids.contains(id) || ov.visible == Some(false) {
            continue;
        }
        let order = ov.order.unwrap_or(working.len() as i64);
        tracing::trace!(block = %id, order, "synthesizing overlay-only block");
        working.push(BlockOverride::synthesize(*id, order, stamp));
    }
    working
}
