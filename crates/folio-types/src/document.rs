//! The document: two ordered block collections plus layout and style.
//!
//! Serialized shape (camelCase, every top-level field required on import):
//!
//! ```text
//! { id, name, description, mainSections[], sidebarWidgets[],
//!   layout{...}, styles{...}, createdAt, updatedAt }
//! ```

use serde::{Deserialize, Serialize};

use crate::block::{Block, Collection};
use crate::ids::{BlockId, DocumentId};
use crate::layout::LayoutSettings;
use crate::style::GlobalStyle;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub description: String,
    /// Sections.
    #[serde(rename = "mainSections")]
    pub main: Vec<Block>,
    /// Widgets.
    #[serde(rename = "sidebarWidgets")]
    pub secondary: Vec<Block>,
    pub layout: LayoutSettings,
    pub styles: GlobalStyle,
    /// Unix millis.
    pub created_at: u64,
    /// Unix millis.
    pub updated_at: u64,
}

impl Document {
    /// Create an empty document with default layout and style.
    pub fn new(name: impl Into<String>) -> Self {
        let now = crate::now_millis();
        Self {
            id: DocumentId::new(),
            name: name.into(),
            description: String::new(),
            main: Vec::new(),
            secondary: Vec::new(),
            layout: LayoutSettings::default(),
            styles: GlobalStyle::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn blocks(&self, collection: Collection) -> &[Block] {
        match collection {
            Collection::Main => &self.main,
            Collection::Secondary => &self.secondary,
        }
    }

    pub fn blocks_mut(&mut self, collection: Collection) -> &mut Vec<Block> {
        match collection {
            Collection::Main => &mut self.main,
            Collection::Secondary => &mut self.secondary,
        }
    }

    pub fn block(&self, collection: Collection, id: &BlockId) -> Option<&Block> {
        self.blocks(collection).iter().find(|b| b.id == *id)
    }

    pub fn block_mut(&mut self, collection: Collection, id: &BlockId) -> Option<&mut Block> {
        self.blocks_mut(collection).iter_mut().find(|b| b.id == *id)
    }

    /// Locate a block in either collection.
    pub fn find(&self, id: &BlockId) -> Option<(Collection, &Block)> {
        self.block(Collection::Main, id)
            .map(|b| (Collection::Main, b))
            .or_else(|| self.block(Collection::Secondary, id).map(|b| (Collection::Secondary, b)))
    }

    pub fn block_count(&self) -> usize {
        self.main.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_count() == 0
    }

    /// Next order value for an appended block: one past the current maximum.
    pub fn next_order(&self, collection: Collection) -> i64 {
        self.blocks(collection)
            .iter()
            .map(|b| b.order)
            .max()
            .map_or(0, |m| m + 1)
    }

    /// Blocks of a collection sorted by order (stable), hidden ones included.
    pub fn ordered(&self, collection: Collection) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks(collection).iter().collect();
        blocks.sort_by_key(|b| b.order);
        blocks
    }

    /// True when the collection's order values are `0..len` in storage order.
    pub fn is_normalized(&self, collection: Collection) -> bool {
        self.blocks(collection)
            .iter()
            .enumerate()
            .all(|(i, b)| b.order == i as i64)
    }

    /// First id that appears twice in the collection, if any.
    pub fn duplicate_id(&self, collection: Collection) -> Option<BlockId> {
        let mut seen = std::collections::HashSet::new();
        self.blocks(collection)
            .iter()
            .find(|b| !seen.insert(b.id))
            .map(|b| b.id)
    }

    /// Compare two documents ignoring timestamps.
    pub fn content_eq(&self, other: &Self) -> bool {
        fn same(a: &[Block], b: &[Block]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
        }
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && same(&self.main, &other.main)
            && same(&self.secondary, &other.secondary)
            && self.layout == other.layout
            && self.styles == other.styles
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn doc_with(orders: &[i64]) -> Document {
        let mut doc = Document::new("test");
        for (i, &o) in orders.iter().enumerate() {
            doc.main.push(Block::new(BlockKind::Text, format!("b{i}"), o));
        }
        doc
    }

    #[test]
    fn test_new_document_is_empty_with_defaults() {
        let doc = Document::new("resume");
        assert!(doc.is_empty());
        assert_eq!(doc.layout, LayoutSettings::default());
        assert_eq!(doc.styles, GlobalStyle::default());
    }

    #[test]
    fn test_next_order() {
        assert_eq!(doc_with(&[]).next_order(Collection::Main), 0);
        assert_eq!(doc_with(&[0, 5, 2]).next_order(Collection::Main), 6);
        assert_eq!(doc_with(&[0, 5]).next_order(Collection::Secondary), 0);
    }

    #[test]
    fn test_ordered_is_stable() {
        let doc = doc_with(&[1, 0, 1]);
        let titles: Vec<&str> = doc.ordered(Collection::Main).iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["b1", "b0", "b2"]);
    }

    #[test]
    fn test_is_normalized() {
        assert!(doc_with(&[0, 1, 2]).is_normalized(Collection::Main));
        assert!(!doc_with(&[0, 2]).is_normalized(Collection::Main));
    }

    #[test]
    fn test_serialized_shape_uses_collection_names() {
        let json = serde_json::to_value(doc_with(&[0])).unwrap();
        assert!(json["mainSections"].is_array());
        assert!(json["sidebarWidgets"].is_array());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_find_searches_both_collections() {
        let mut doc = doc_with(&[0]);
        let widget = Block::new(BlockKind::Contact, "Contact", 0);
        let wid = widget.id;
        doc.secondary.push(widget);
        assert_eq!(doc.find(&wid).map(|(c, _)| c), Some(Collection::Secondary));
        assert!(doc.find(&BlockId::new()).is_none());
    }

    #[test]
    fn test_duplicate_id_detection() {
        let mut doc = doc_with(&[0]);
        assert_eq!(doc.duplicate_id(Collection::Main), None);
        let copy = doc.main[0].clone();
        doc.main.push(copy);
        assert_eq!(doc.duplicate_id(Collection::Main), Some(doc.main[0].id));
    }
}
