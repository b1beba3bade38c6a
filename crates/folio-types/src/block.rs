//! Block types: the content units a document is assembled from.
//!
//! One [`Block`] struct covers both collections. Blocks in the main
//! collection are *sections*; blocks in the secondary collection are
//! *widgets*, which additionally honour `collapsible`.
//!
//! ## Design: closed kind set with an explicit fallback
//!
//! `BlockKind` is a closed enum. Component names that don't parse (from an
//! overlay or an older export) land on `BlockKind::Unknown` rather than being
//! rejected, so a document always loads; renderers log and skip those blocks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::BlockId;
use crate::style::StyleOverrides;

/// What a block *is* (content type).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    /// Plain paragraph text.
    #[default]
    Text,
    /// Free-form rich text (markup supplied by the author).
    #[serde(alias = "custom-text", alias = "customText")]
    #[strum(serialize = "custom_text", serialize = "custom-text", serialize = "customtext")]
    CustomText,
    Image,
    Video,
    Form,
    List,
    Contact,
    Hero,
    Experience,
    Education,
    Skills,
    Projects,
    /// Unrecognized component name. Renders nothing.
    #[serde(other)]
    #[strum(disabled)]
    Unknown,
}

impl BlockKind {
    /// Every renderable kind, in catalog order.
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Text,
        BlockKind::CustomText,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Form,
        BlockKind::List,
        BlockKind::Contact,
        BlockKind::Hero,
        BlockKind::Experience,
        BlockKind::Education,
        BlockKind::Skills,
        BlockKind::Projects,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Parse a component name, mapping anything unrecognized to `Unknown`.
    pub fn from_component(s: &str) -> Self {
        Self::from_str(s).unwrap_or(BlockKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::CustomText => "custom_text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Form => "form",
            BlockKind::List => "list",
            BlockKind::Contact => "contact",
            BlockKind::Hero => "hero",
            BlockKind::Experience => "experience",
            BlockKind::Education => "education",
            BlockKind::Skills => "skills",
            BlockKind::Projects => "projects",
            BlockKind::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlockKind::Unknown)
    }

    /// Check if this kind carries media by reference (image/video).
    pub fn is_media(&self) -> bool {
        matches!(self, BlockKind::Image | BlockKind::Video)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Layout region discriminant stored on a block.
///
/// What a value *means* depends on the layout mode; the mapping lives in
/// `LayoutMode::slot_for` so there is exactly one table to consult.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(pub u8);

impl Region {
    pub const HEADER: Region = Region(0);
    /// Main body, or the left column in two-column mode.
    pub const MAIN: Region = Region(1);
    /// Sidebar, or the right column in two-column mode.
    pub const SIDEBAR: Region = Region(2);
    pub const FOOTER: Region = Region(3);
}

impl Default for Region {
    fn default() -> Self {
        Region::MAIN
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a document's two ordered collections an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Collection {
    /// Sections (`mainSections`).
    #[strum(serialize = "main", serialize = "sections")]
    Main,
    /// Widgets (`sidebarWidgets`).
    #[strum(serialize = "secondary", serialize = "widgets", serialize = "sidebar")]
    Secondary,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Main => "main",
            Collection::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single content unit.
///
/// `content` is the kind-specific payload kept as plain JSON so unknown
/// shapes survive a load/save cycle untouched; `folio-compose` decodes it
/// into a typed view when rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub title: String,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default, rename = "styleOverrides", skip_serializing_if = "StyleOverrides::is_empty")]
    pub style: StyleOverrides,
    /// Position within the collection. Contiguous only after a reorder.
    pub order: i64,
    pub visible: bool,
    #[serde(default)]
    pub region: Region,
    /// Widgets only: whether the widget may be collapsed by the viewer.
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsible: bool,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

/// Helper for `#[serde(skip_serializing_if)]` on bool fields.
fn is_false(v: &bool) -> bool {
    !v
}

impl Block {
    /// Create a visible block in the main region with a fresh id.
    pub fn new(kind: BlockKind, title: impl Into<String>, order: i64) -> Self {
        let now = crate::now_millis();
        Self {
            id: BlockId::new(),
            kind,
            title: title.into(),
            content: serde_json::Value::Null,
            style: StyleOverrides::default(),
            order,
            visible: true,
            region: Region::MAIN,
            collapsible: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Instantiate a seed at the given order.
    pub fn from_seed(seed: &BlockSeed, order: i64) -> Self {
        let mut block = Self::new(seed.kind, seed.title.clone(), order);
        block.content = seed.default_content.clone();
        block.style = seed.default_styles.clone();
        block.region = seed.region;
        block
    }

    /// Apply a partial patch. Returns true if any field changed.
    ///
    /// Simple fields replace; `style` merges key-wise.
    pub fn apply_patch(&mut self, patch: &BlockPatch) -> bool {
        let before = self.clone();
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(style) = &patch.style {
            self.style.merge(style);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(region) = patch.region {
            self.region = region;
        }
        if let Some(collapsible) = patch.collapsible {
            self.collapsible = collapsible;
        }
        *self != before
    }

    /// Compare two blocks ignoring timestamps.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.title == other.title
            && self.content == other.content
            && self.style == other.style
            && self.order == other.order
            && self.visible == other.visible
            && self.region == other.region
            && self.collapsible == other.collapsible
    }
}

/// Partial update to a [`Block`]. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: Option<BlockKind>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub style: Option<StyleOverrides>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub collapsible: Option<bool>,
}

impl BlockPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(content);
        self
    }

    pub fn style(mut self, style: StyleOverrides) -> Self {
        self.style = Some(style);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

/// Template for a new block, as supplied by a catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSeed {
    pub kind: BlockKind,
    pub title: String,
    #[serde(default)]
    pub default_content: serde_json::Value,
    #[serde(default)]
    pub default_styles: StyleOverrides,
    #[serde(default)]
    pub region: Region,
}

impl BlockSeed {
    pub fn new(kind: BlockKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            default_content: serde_json::Value::Null,
            default_styles: StyleOverrides::default(),
            region: Region::MAIN,
        }
    }

    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.default_content = content;
        self
    }

    pub fn styles(mut self, styles: StyleOverrides) -> Self {
        self.default_styles = styles;
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_aliases() {
        assert_eq!(BlockKind::from_str("TEXT"), Some(BlockKind::Text));
        assert_eq!(BlockKind::from_str("custom-text"), Some(BlockKind::CustomText));
        assert_eq!(BlockKind::from_str("customtext"), Some(BlockKind::CustomText));
        assert_eq!(BlockKind::from_str("unknown"), None);
        assert_eq!(BlockKind::from_component("carousel"), BlockKind::Unknown);
    }

    #[test]
    fn test_kind_serde_unknown_fallback() {
        let kind: BlockKind = serde_json::from_str("\"carousel\"").unwrap();
        assert_eq!(kind, BlockKind::Unknown);
        let kind: BlockKind = serde_json::from_str("\"custom-text\"").unwrap();
        assert_eq!(kind, BlockKind::CustomText);
        assert_eq!(serde_json::to_string(&BlockKind::CustomText).unwrap(), "\"custom_text\"");
    }

    #[test]
    fn test_kind_as_str_roundtrips_through_parse() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_patch_merges_style_keywise() {
        let mut block = Block::new(BlockKind::Text, "About", 0);
        block.style.background = Some("#eee".into());

        let changed = block.apply_patch(&BlockPatch::default().title("About me").style(
            StyleOverrides {
                padding: Some(32),
                ..Default::default()
            },
        ));

        assert!(changed);
        assert_eq!(block.title, "About me");
        assert_eq!(block.style.background.as_deref(), Some("#eee"));
        assert_eq!(block.style.padding, Some(32));
    }

    #[test]
    fn test_empty_patch_reports_no_change() {
        let mut block = Block::new(BlockKind::Image, "Photo", 3);
        assert!(!block.apply_patch(&BlockPatch::default()));
    }

    #[test]
    fn test_from_seed_copies_defaults() {
        let seed = BlockSeed::new(BlockKind::List, "Skills")
            .content(serde_json::json!({ "items": ["Rust"] }))
            .region(Region::SIDEBAR);
        let block = Block::from_seed(&seed, 4);
        assert_eq!(block.kind, BlockKind::List);
        assert_eq!(block.order, 4);
        assert_eq!(block.region, Region::SIDEBAR);
        assert!(block.visible);
        assert_eq!(block.content["items"][0], "Rust");
    }

    #[test]
    fn test_block_serializes_camel_case() {
        let mut block = Block::new(BlockKind::Text, "Intro", 0);
        block.style.padding = Some(4);
        let json = serde_json::to_value(&block).unwrap();
        assert!(json.get("styleOverrides").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("collapsible").is_none());
        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_collection_parse() {
        assert_eq!("widgets".parse::<Collection>().unwrap(), Collection::Secondary);
        assert_eq!("Main".parse::<Collection>().unwrap(), Collection::Main);
    }
}
