//! Plain-text outline renderer for `folio render`.

use std::io::{self, Write};

use folio_compose::{BlockContent, BlockRenderer, RenderBlock};
use folio_types::{Collection, Slot, Spacing};

/// Writes one line per block, grouped under slot headings.
///
/// Write errors are held until [`finish`](Self::finish) since the renderer
/// callbacks can't return them.
pub struct OutlineRenderer<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> OutlineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            self.error = Some(e);
        }
    }

    /// Flush and surface the first write error, if any.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}

impl<W: Write> BlockRenderer for OutlineRenderer<W> {
    fn begin_region(&mut self, slot: Slot, spacing: &Spacing) {
        self.line(format_args!("[{slot}]  gap {}px", spacing.section_gap));
    }

    fn render(&mut self, rb: &RenderBlock, content: &BlockContent) {
        let marker = match rb.collection {
            Collection::Main => '-',
            Collection::Secondary => '*',
        };
        let summary = content.summary();
        let title = if rb.block.title.is_empty() {
            "(untitled)"
        } else {
            rb.block.title.as_str()
        };
        if summary.is_empty() {
            self.line(format_args!("  {marker} {title} <{}>", content.kind()));
        } else {
            self.line(format_args!("  {marker} {title} <{}>: {summary}", content.kind()));
        }
    }

    fn end_region(&mut self, _slot: Slot) {
        self.line(format_args!(""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_compose::{Overlay, render_view, resolve_for_render};
    use folio_types::{Block, BlockKind, Document, LayoutMode, Region};
    use serde_json::json;

    #[test]
    fn test_outline_groups_by_slot() {
        let mut doc = Document::new("cv");
        let mut hero = Block::new(BlockKind::Hero, "Top", 0);
        hero.region = Region::HEADER;
        hero.content = json!({ "headline": "Ada Lovelace" });
        doc.main.push(hero);
        doc.main.push(Block::new(BlockKind::Text, "About", 1));

        let view = resolve_for_render(&doc, &Overlay::new(), LayoutMode::HeaderFooter);
        let mut out = OutlineRenderer::new(Vec::new());
        let stats = render_view(&view, &mut out);
        assert_eq!(stats.rendered, 2);

        let OutlineRenderer { out: bytes, error } = out;
        assert!(error.is_none());
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "[header]  gap 24px\n  - Top <hero>: Ada Lovelace\n\n\
             [body]  gap 24px\n  - About <text>\n\n\
             [footer]  gap 24px\n\n"
        );
    }
}
