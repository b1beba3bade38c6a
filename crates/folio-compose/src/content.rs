//! Typed views of block payloads and the renderer dispatch.
//!
//! Stored content is plain JSON so foreign or older shapes survive a
//! load/save cycle. Rendering decodes it into [`BlockContent`], a closed
//! union keyed by [`BlockKind`]. `Unknown` kinds and payloads that fail to
//! decode are logged and render nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_types::{BlockKind, Slot, Spacing};

use crate::layout::{RenderBlock, RenderView};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomText {
    /// Author-supplied markup, passed through untouched.
    pub markup: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContent {
    pub url: String,
    pub autoplay: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub name: String,
    pub label: String,
    /// HTML-ish input type: `text`, `email`, `textarea`, ...
    pub input: String,
    pub required: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormContent {
    pub fields: Vec<FormField>,
    pub submit_label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListContent {
    pub items: Vec<String>,
    pub ordered: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactContent {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: Option<String>,
    pub cta: Option<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEntry {
    pub title: String,
    pub organization: String,
    pub start: String,
    /// `None` means ongoing.
    pub end: Option<String>,
    pub summary: Option<String>,
}

/// Shared by `experience` and `education`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineContent {
    pub entries: Vec<TimelineEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    /// 1-5 when given.
    pub level: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsContent {
    pub skills: Vec<Skill>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsContent {
    pub projects: Vec<Project>,
}

/// Decoded payload, one variant per renderable kind.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockContent {
    Text(TextContent),
    CustomText(CustomText),
    Image(ImageContent),
    Video(VideoContent),
    Form(FormContent),
    List(ListContent),
    Contact(ContactContent),
    Hero(HeroContent),
    Experience(TimelineContent),
    Education(TimelineContent),
    Skills(SkillsContent),
    Projects(ProjectsContent),
}

/// Why a payload could not be decoded.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("no content shape for kind {0}")]
    UnknownKind(BlockKind),

    #[error("invalid {kind} content: {source}")]
    Invalid {
        kind: BlockKind,
        #[source]
        source: serde_json::Error,
    },
}

impl BlockContent {
    /// Decode `value` as the shape for `kind`. `null` decodes as an empty payload.
    pub fn decode(kind: BlockKind, value: &Value) -> Result<Self, ContentError> {
        fn de<T: serde::de::DeserializeOwned>(
            kind: BlockKind,
            value: &Value,
        ) -> Result<T, ContentError> {
            let value = if value.is_null() {
                Value::Object(Default::default())
            } else {
                value.clone()
            };
            serde_json::from_value(value).map_err(|source| ContentError::Invalid { kind, source })
        }

        Ok(match kind {
            BlockKind::Text => BlockContent::Text(de(kind, value)?),
            BlockKind::CustomText => BlockContent::CustomText(de(kind, value)?),
            BlockKind::Image => BlockContent::Image(de(kind, value)?),
            BlockKind::Video => BlockContent::Video(de(kind, value)?),
            BlockKind::Form => BlockContent::Form(de(kind, value)?),
            BlockKind::List => BlockContent::List(de(kind, value)?),
            BlockKind::Contact => BlockContent::Contact(de(kind, value)?),
            BlockKind::Hero => BlockContent::Hero(de(kind, value)?),
            BlockKind::Experience => BlockContent::Experience(de(kind, value)?),
            BlockKind::Education => BlockContent::Education(de(kind, value)?),
            BlockKind::Skills => BlockContent::Skills(de(kind, value)?),
            BlockKind::Projects => BlockContent::Projects(de(kind, value)?),
            BlockKind::Unknown => return Err(ContentError::UnknownKind(kind)),
        })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::CustomText(_) => BlockKind::CustomText,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Video(_) => BlockKind::Video,
            BlockContent::Form(_) => BlockKind::Form,
            BlockContent::List(_) => BlockKind::List,
            BlockContent::Contact(_) => BlockKind::Contact,
            BlockContent::Hero(_) => BlockKind::Hero,
            BlockContent::Experience(_) => BlockKind::Experience,
            BlockContent::Education(_) => BlockKind::Education,
            BlockContent::Skills(_) => BlockKind::Skills,
            BlockContent::Projects(_) => BlockKind::Projects,
        }
    }

    /// One-line outline text.
    pub fn summary(&self) -> String {
        match self {
            BlockContent::Text(t) => first_line(&t.body),
            BlockContent::CustomText(t) => first_line(&t.markup),
            BlockContent::Image(i) => match &i.caption {
                Some(c) => format!("{} ({c})", i.src),
                None => i.src.clone(),
            },
            BlockContent::Video(v) => v.url.clone(),
            BlockContent::Form(f) => format!("{} fields", f.fields.len()),
            BlockContent::List(l) => format!("{} items", l.items.len()),
            BlockContent::Contact(c) => c
                .email
                .clone()
                .or_else(|| c.phone.clone())
                .unwrap_or_else(|| format!("{} links", c.links.len())),
            BlockContent::Hero(h) => h.headline.clone(),
            BlockContent::Experience(t) | BlockContent::Education(t) => {
                format!("{} entries", t.entries.len())
            }
            BlockContent::Skills(s) => s
                .skills
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            BlockContent::Projects(p) => format!("{} projects", p.projects.len()),
        }
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().to_string()
}

/// Caller-supplied drawing surface.
///
/// Region hooks default to nothing so simple renderers only implement
/// [`render`](Self::render).
pub trait BlockRenderer {
    fn begin_region(&mut self, _slot: Slot, _spacing: &Spacing) {}

    fn render(&mut self, block: &RenderBlock, content: &BlockContent);

    fn end_region(&mut self, _slot: Slot) {}
}

/// Counts from one [`render_view`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rendered: usize,
    pub skipped: usize,
}

/// Walk `view` slot by slot, decoding each block and handing it to `renderer`.
pub fn render_view(view: &RenderView, renderer: &mut dyn BlockRenderer) -> RenderStats {
    let mut stats = RenderStats::default();
    for (slot, blocks) in &view.regions {
        renderer.begin_region(*slot, &view.spacing);
        for rb in blocks {
            match BlockContent::decode(rb.block.kind, &rb.block.content) {
                Ok(content) => {
                    renderer.render(rb, &content);
                    stats.rendered += 1;
                }
                Err(e) => {
                    tracing::warn!(block = %rb.block.id, error = %e, "block not rendered");
                    stats.skipped += 1;
                }
            }
        }
        renderer.end_region(*slot);
    }
    stats
}
