//! Block templates: where `add_block` gets its defaults from.

use serde_json::json;

use folio_types::{Alignment, BlockKind, BlockSeed, Region, StyleOverrides, WidthClass};

/// A source of templates for new blocks.
pub trait SeedSource {
    /// Template for `kind`, or `None` if this source doesn't offer it.
    fn seed(&self, kind: BlockKind) -> Option<BlockSeed>;

    /// Kinds this source can seed, in display order.
    fn kinds(&self) -> Vec<BlockKind>;
}

/// Templates for every built-in kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCatalog;

impl SeedSource for BuiltinCatalog {
    fn seed(&self, kind: BlockKind) -> Option<BlockSeed> {
        let seed = match kind {
            BlockKind::Text => BlockSeed::new(kind, "About").content(json!({ "body": "" })),
            BlockKind::CustomText => {
                BlockSeed::new(kind, "Custom").content(json!({ "markup": "" }))
            }
            BlockKind::Image => BlockSeed::new(kind, "Image")
                .content(json!({ "src": "", "alt": "" }))
                .styles(StyleOverrides {
                    alignment: Some(Alignment::Center),
                    ..Default::default()
                }),
            BlockKind::Video => {
                BlockSeed::new(kind, "Video").content(json!({ "url": "", "autoplay": false }))
            }
            BlockKind::Form => BlockSeed::new(kind, "Contact form").content(json!({
                "fields": [
                    { "name": "name", "label": "Name", "input": "text", "required": true },
                    { "name": "email", "label": "Email", "input": "email", "required": true },
                    { "name": "message", "label": "Message", "input": "textarea", "required": false }
                ],
                "submitLabel": "Send"
            })),
            BlockKind::List => {
                BlockSeed::new(kind, "List").content(json!({ "items": [], "ordered": false }))
            }
            BlockKind::Contact => BlockSeed::new(kind, "Contact")
                .content(json!({ "email": null, "phone": null, "location": null, "links": [] }))
                .region(Region::SIDEBAR),
            BlockKind::Hero => BlockSeed::new(kind, "Hero")
                .content(json!({ "headline": "Your name", "subheadline": null }))
                .region(Region::HEADER)
                .styles(StyleOverrides {
                    alignment: Some(Alignment::Center),
                    width: Some(WidthClass::Full),
                    ..Default::default()
                }),
            BlockKind::Experience => {
                BlockSeed::new(kind, "Experience").content(json!({ "entries": [] }))
            }
            BlockKind::Education => {
                BlockSeed::new(kind, "Education").content(json!({ "entries": [] }))
            }
            BlockKind::Skills => BlockSeed::new(kind, "Skills")
                .content(json!({ "skills": [] }))
                .region(Region::SIDEBAR),
            BlockKind::Projects => {
                BlockSeed::new(kind, "Projects").content(json!({ "projects": [] }))
            }
            BlockKind::Unknown => return None,
        };
        Some(seed)
    }

    fn kinds(&self) -> Vec<BlockKind> {
        BlockKind::ALL.to_vec()
    }
}
