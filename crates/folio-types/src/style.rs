//! Visual style descriptors.
//!
//! Two layers: [`StyleOverrides`] is the sparse per-block record (every field
//! optional), [`GlobalStyle`] is the document-wide palette, typography, and
//! base spacing that unset overrides fall back to. [`ResolvedStyle`] is the
//! fully populated result handed to renderers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Horizontal alignment of block content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Width class of a block within its region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum WidthClass {
    #[default]
    Full,
    Wide,
    Half,
    Narrow,
}

impl WidthClass {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidthClass::Full => "full",
            WidthClass::Wide => "wide",
            WidthClass::Half => "half",
            WidthClass::Narrow => "narrow",
        }
    }
}

/// Sparse per-block visual properties.
///
/// Unset fields fall back to layout/global defaults at render time. Merging
/// is key-wise: a patch that sets only `padding` leaves `background` intact.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Inner spacing in px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    /// Outer spacing in px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<WidthClass>,
}

impl StyleOverrides {
    /// True when no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `other` into `self`; every property `other` sets wins.
    pub fn merge(&mut self, other: &StyleOverrides) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.background, &other.background);
        take(&mut self.text_color, &other.text_color);
        take(&mut self.padding, &other.padding);
        take(&mut self.margin, &other.margin);
        take(&mut self.border_radius, &other.border_radius);
        take(&mut self.shadow, &other.shadow);
        take(&mut self.alignment, &other.alignment);
        take(&mut self.width, &other.width);
    }

    /// Non-mutating form of [`merge`](Self::merge).
    pub fn merged(&self, other: &StyleOverrides) -> StyleOverrides {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Fill every unset property from the document's global style.
    pub fn resolve(&self, global: &GlobalStyle) -> ResolvedStyle {
        ResolvedStyle {
            background: self
                .background
                .clone()
                .unwrap_or_else(|| global.palette.background.clone()),
            text_color: self
                .text_color
                .clone()
                .unwrap_or_else(|| global.palette.text.clone()),
            padding: self.padding.unwrap_or(global.base_spacing),
            margin: self.margin.unwrap_or(0),
            border_radius: self.border_radius.unwrap_or(0),
            shadow: self.shadow.unwrap_or(false),
            alignment: self.alignment.unwrap_or_default(),
            width: self.width.unwrap_or_default(),
            heading_font: global.typography.heading_font.clone(),
            body_font: global.typography.body_font.clone(),
            font_size: global.typography.base_size,
        }
    }
}

/// Every visual property with a concrete value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedStyle {
    pub background: String,
    pub text_color: String,
    pub padding: u32,
    pub margin: u32,
    pub border_radius: u32,
    pub shadow: bool,
    pub alignment: Alignment,
    pub width: WidthClass,
    pub heading_font: String,
    pub body_font: String,
    pub font_size: u32,
}

/// Document colour palette (CSS colour strings).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#1f2937".into(),
            secondary: "#4b5563".into(),
            accent: "#2563eb".into(),
            background: "#ffffff".into(),
            text: "#111827".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
    /// Base font size in px.
    pub base_size: u32,
    pub line_height: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading_font: "Inter".into(),
            body_font: "Inter".into(),
            base_size: 16,
            line_height: 1.5,
        }
    }
}

/// Document-wide style: palette, typography, base spacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStyle {
    pub palette: Palette,
    pub typography: Typography,
    /// Default block padding in px.
    pub base_spacing: u32,
}

impl Default for GlobalStyle {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            typography: Typography::default(),
            base_spacing: 16,
        }
    }
}

/// Partial update to [`GlobalStyle`]. Palette fields merge individually.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStylePatch {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub heading_font: Option<String>,
    #[serde(default)]
    pub body_font: Option<String>,
    #[serde(default)]
    pub base_size: Option<u32>,
    #[serde(default)]
    pub line_height: Option<f32>,
    #[serde(default)]
    pub base_spacing: Option<u32>,
}

impl GlobalStyle {
    pub fn apply(&mut self, patch: &GlobalStylePatch) {
        let p = &mut self.palette;
        if let Some(v) = &patch.primary {
            p.primary = v.clone();
        }
        if let Some(v) = &patch.secondary {
            p.secondary = v.clone();
        }
        if let Some(v) = &patch.accent {
            p.accent = v.clone();
        }
        if let Some(v) = &patch.background {
            p.background = v.clone();
        }
        if let Some(v) = &patch.text {
            p.text = v.clone();
        }
        let t = &mut self.typography;
        if let Some(v) = &patch.heading_font {
            t.heading_font = v.clone();
        }
        if let Some(v) = &patch.body_font {
            t.body_font = v.clone();
        }
        if let Some(v) = patch.base_size {
            t.base_size = v;
        }
        if let Some(v) = patch.line_height {
            t.line_height = v;
        }
        if let Some(v) = patch.base_spacing {
            self.base_spacing = v;
        }
    }
}
