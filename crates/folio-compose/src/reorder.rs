//! Reorder one collection by rendered (visible) index.
//!
//! Hidden blocks keep their relative place: the source is lifted out of the
//! full order-sorted list and reinserted in front of the block that
//! currently sits at the destination's visible index. Afterwards every
//! block's `order` equals its position, and storage is kept in that order.

use folio_types::Block;

/// Move the visible block at `source` to visible index `destination`.
///
/// Returns false (and leaves `blocks` untouched) when `destination` is
/// `None` or either index is out of range.
pub fn move_block(blocks: &mut Vec<Block>, source: usize, destination: Option<usize>) -> bool {
    let Some(dest) = destination else {
        tracing::debug!(source, "drop outside any target, ignoring");
        return false;
    };

    let mut full = blocks.clone();
    full.sort_by_key(|b| b.order);

    let visible: Vec<usize> = visible_positions(&full);
    if source >= visible.len() || dest >= visible.len() {
        tracing::debug!(
            source,
            dest,
            visible = visible.len(),
            "reorder index out of range"
        );
        return false;
    }

    let moved = full.remove(visible[source]);
    let remaining = visible_positions(&full);
    let insert_at = match remaining.get(dest) {
        Some(&pos) => pos,
        None => remaining.last().map_or(full.len(), |&pos| pos + 1),
    };
    full.insert(insert_at, moved);

    for (i, block) in full.iter_mut().enumerate() {
        block.order = i as i64;
    }
    *blocks = full;
    true
}

fn visible_positions(blocks: &[Block]) -> Vec<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.visible)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::BlockKind;
    use pretty_assertions::assert_eq;

    fn blocks(titles: &[&str]) -> Vec<Block> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Block::new(BlockKind::Text, *t, i as i64))
            .collect()
    }

    fn layout(blocks: &[Block]) -> Vec<(String, i64)> {
        blocks.iter().map(|b| (b.title.clone(), b.order)).collect()
    }

    #[test]
    fn test_move_first_to_last() {
        let mut list = blocks(&["A", "B", "C"]);
        assert!(move_block(&mut list, 0, Some(2)));
        assert_eq!(
            layout(&list),
            vec![("B".into(), 0), ("C".into(), 1), ("A".into(), 2)]
        );
    }

    #[test]
    fn test_move_last_to_first() {
        let mut list = blocks(&["A", "B", "C"]);
        assert!(move_block(&mut list, 2, Some(0)));
        assert_eq!(
            layout(&list),
            vec![("C".into(), 0), ("A".into(), 1), ("B".into(), 2)]
        );
    }

    #[test]
    fn test_no_destination_is_noop() {
        let mut list = blocks(&["A", "B"]);
        let before = list.clone();
        assert!(!move_block(&mut list, 0, None));
        assert_eq!(list, before);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut list = blocks(&["A", "B"]);
        let before = list.clone();
        assert!(!move_block(&mut list, 2, Some(0)));
        assert!(!move_block(&mut list, 0, Some(5)));
        assert_eq!(list, before);
    }

    #[test]
    fn test_hidden_blocks_are_skipped_by_index() {
        // Rendered view: A C D  (B hidden).
        let mut list = blocks(&["A", "B", "C", "D"]);
        list[1].visible = false;

        assert!(move_block(&mut list, 2, Some(1)));
        // D lands in front of C, B keeps its place after A.
        let titles: Vec<&str> = list.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "D", "C"]);
        assert!(list.iter().enumerate().all(|(i, b)| b.order == i as i64));
    }

    #[test]
    fn test_unsorted_storage_is_normalized() {
        let mut list = blocks(&["A", "B", "C"]);
        list[0].order = 10;
        list[1].order = 5;
        list[2].order = 7;
        // Rendered view: B C A.
        assert!(move_block(&mut list, 0, Some(0)));
        let titles: Vec<&str> = list.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
        assert!(list.iter().enumerate().all(|(i, b)| b.order == i as i64));
    }
}
