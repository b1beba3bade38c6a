//! Layout modes, named slots, and the region table that connects them.
//!
//! A block stores a numeric [`Region`]; a [`LayoutMode`] decides which named
//! [`Slot`] (if any) that region lands in:
//!
//! ```text
//! mode            slots                    region → slot
//! default         content                  *  → content
//! single_column   main                     1  → main
//! two_column      left, right              1  → left,   2 → right
//! sidebar         sidebar, content         2  → sidebar, 1 → content
//! header_footer   header, body, footer     0  → header, 1 → body, 3 → footer
//! ```
//!
//! Regions with no slot in the active mode are excluded from that mode's view.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::block::Region;

/// How regions are arranged on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum LayoutMode {
    /// No routing: every block goes to `content`.
    #[default]
    Default,
    #[serde(alias = "single-column")]
    #[strum(serialize = "single_column", serialize = "single-column", serialize = "single")]
    SingleColumn,
    #[serde(alias = "two-column")]
    #[strum(serialize = "two_column", serialize = "two-column", serialize = "two")]
    TwoColumn,
    Sidebar,
    #[serde(alias = "header-footer")]
    #[strum(serialize = "header_footer", serialize = "header-footer")]
    HeaderFooter,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 5] = [
        LayoutMode::Default,
        LayoutMode::SingleColumn,
        LayoutMode::TwoColumn,
        LayoutMode::Sidebar,
        LayoutMode::HeaderFooter,
    ];

    /// Parse from string (case-insensitive, `-` and `_` both accepted).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Default => "default",
            LayoutMode::SingleColumn => "single_column",
            LayoutMode::TwoColumn => "two_column",
            LayoutMode::Sidebar => "sidebar",
            LayoutMode::HeaderFooter => "header_footer",
        }
    }

    /// Slots this mode renders, in page order. Always present, even when empty.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            LayoutMode::Default => &[Slot::Content],
            LayoutMode::SingleColumn => &[Slot::Main],
            LayoutMode::TwoColumn => &[Slot::Left, Slot::Right],
            LayoutMode::Sidebar => &[Slot::Sidebar, Slot::Content],
            LayoutMode::HeaderFooter => &[Slot::Header, Slot::Body, Slot::Footer],
        }
    }

    /// The slot a region routes to in this mode, or `None` if it's excluded.
    pub fn slot_for(&self, region: Region) -> Option<Slot> {
        match (self, region) {
            (LayoutMode::Default, _) => Some(Slot::Content),
            (LayoutMode::SingleColumn, Region::MAIN) => Some(Slot::Main),
            (LayoutMode::TwoColumn, Region::MAIN) => Some(Slot::Left),
            (LayoutMode::TwoColumn, Region::SIDEBAR) => Some(Slot::Right),
            (LayoutMode::Sidebar, Region::SIDEBAR) => Some(Slot::Sidebar),
            (LayoutMode::Sidebar, Region::MAIN) => Some(Slot::Content),
            (LayoutMode::HeaderFooter, Region::HEADER) => Some(Slot::Header),
            (LayoutMode::HeaderFooter, Region::MAIN) => Some(Slot::Body),
            (LayoutMode::HeaderFooter, Region::FOOTER) => Some(Slot::Footer),
            _ => None,
        }
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.slots().contains(&slot)
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named bucket in a layout mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Slot {
    Content,
    Main,
    Left,
    Right,
    Sidebar,
    Header,
    Body,
    Footer,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Content => "content",
            Slot::Main => "main",
            Slot::Left => "left",
            Slot::Right => "right",
            Slot::Sidebar => "sidebar",
            Slot::Header => "header",
            Slot::Body => "body",
            Slot::Footer => "footer",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spacing in px.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    /// Gap between consecutive blocks in a slot.
    pub section_gap: u32,
    /// Gap between slots.
    pub region_gap: u32,
    pub page_padding: u32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            section_gap: 24,
            region_gap: 32,
            page_padding: 40,
        }
    }
}

/// Layout descriptor stored on a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub mode: LayoutMode,
    #[serde(default)]
    pub spacing: Spacing,
    /// Where the secondary collection is placed, if anywhere. Defaults to
    /// the sidebar slot; `null` leaves widgets out of every mode.
    #[serde(default = "default_secondary_slot")]
    pub secondary_slot: Option<Slot>,
}

fn default_secondary_slot() -> Option<Slot> {
    Some(Slot::Sidebar)
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            spacing: Spacing::default(),
            secondary_slot: default_secondary_slot(),
        }
    }
}

/// Partial update to [`LayoutSettings`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPatch {
    #[serde(default)]
    pub mode: Option<LayoutMode>,
    #[serde(default)]
    pub section_gap: Option<u32>,
    #[serde(default)]
    pub region_gap: Option<u32>,
    #[serde(default)]
    pub page_padding: Option<u32>,
    /// `Some(None)` clears the placement.
    #[serde(default)]
    pub secondary_slot: Option<Option<Slot>>,
}

impl LayoutSettings {
    pub fn apply(&mut self, patch: &LayoutPatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(v) = patch.section_gap {
            self.spacing.section_gap = v;
        }
        if let Some(v) = patch.region_gap {
            self.spacing.region_gap = v;
        }
        if let Some(v) = patch.page_padding {
            self.spacing.page_padding = v;
        }
        if let Some(slot) = patch.secondary_slot {
            self.secondary_slot = slot;
        }
    }
}
