//! OCR region types.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Side length of the normalized coordinate space.
pub const NORMALIZED_EXTENT: f32 = 1000.0;

/// One detected content block on a page.
///
/// Regions arrive from the OCR service and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Index of the region, unique within its page
    pub index: u32,

    /// Coarse structural label
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: StructuralLabel,

    /// Fine-grained semantic subtype
    #[serde(default, deserialize_with = "null_as_default")]
    pub native_label: NativeLabel,

    /// Bounding box in the 0-1000 normalized space
    #[serde(default, alias = "bbox", rename = "bbox_2d")]
    pub bbox: Option<BBox>,

    /// Raw content: plain or markdown text, or table markup
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// Read an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Region {
    /// Create a region with no bounding box and empty content.
    pub fn new(index: u32, label: StructuralLabel, native_label: NativeLabel) -> Self {
        Self {
            index,
            label,
            native_label,
            bbox: None,
            content: String::new(),
        }
    }

    /// Create a body text region.
    pub fn text(index: u32, content: impl Into<String>) -> Self {
        Self::new(index, StructuralLabel::Text, NativeLabel::Text).with_content(content)
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: impl Into<BBox>) -> Self {
        self.bbox = Some(bbox.into());
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Check whether this is a body text region.
    pub fn is_text(&self) -> bool {
        self.label == StructuralLabel::Text
    }
}

/// Coarse structural label of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralLabel {
    /// Text of any kind, including titles and captions
    #[default]
    Text,
    /// Table markup
    Table,
    /// Picture cropped to an external asset
    Image,
    /// Display or inline formula
    Formula,
    /// Any label this crate does not know
    #[serde(other)]
    Other,
}

/// Fine-grained semantic subtype of a region.
///
/// Unknown labels are preserved verbatim so they survive a JSON round trip;
/// style resolution treats them like [`NativeLabel::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NativeLabel {
    /// Document title
    DocTitle,
    /// Section title
    ParagraphTitle,
    /// Body paragraph
    #[default]
    Text,
    /// Figure or table caption
    FigureTitle,
    /// Footnote
    VisionFootnote,
    /// Table
    Table,
    /// Display formula
    DisplayFormula,
    /// Inline formula
    InlineFormula,
    /// Abstract
    Abstract,
    /// Bibliography entry
    ReferenceContent,
    /// Vertically set text
    VerticalText,
    /// Unrecognized label
    Other(String),
}

impl NativeLabel {
    /// Label as it appears in OCR output.
    pub fn as_str(&self) -> &str {
        match self {
            NativeLabel::DocTitle => "doc_title",
            NativeLabel::ParagraphTitle => "paragraph_title",
            NativeLabel::Text => "text",
            NativeLabel::FigureTitle => "figure_title",
            NativeLabel::VisionFootnote => "vision_footnote",
            NativeLabel::Table => "table",
            NativeLabel::DisplayFormula => "display_formula",
            NativeLabel::InlineFormula => "inline_formula",
            NativeLabel::Abstract => "abstract",
            NativeLabel::ReferenceContent => "reference_content",
            NativeLabel::VerticalText => "vertical_text",
            NativeLabel::Other(s) => s,
        }
    }

    /// Heading level for title-like labels.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            NativeLabel::DocTitle => Some(1),
            NativeLabel::ParagraphTitle => Some(2),
            _ => None,
        }
    }

    /// Check whether this label marks a formula.
    pub fn is_formula(&self) -> bool {
        matches!(
            self,
            NativeLabel::DisplayFormula | NativeLabel::InlineFormula
        )
    }
}

impl From<String> for NativeLabel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "doc_title" => NativeLabel::DocTitle,
            "paragraph_title" => NativeLabel::ParagraphTitle,
            "text" => NativeLabel::Text,
            "figure_title" => NativeLabel::FigureTitle,
            "vision_footnote" => NativeLabel::VisionFootnote,
            "table" => NativeLabel::Table,
            "display_formula" => NativeLabel::DisplayFormula,
            "inline_formula" => NativeLabel::InlineFormula,
            "abstract" => NativeLabel::Abstract,
            "reference_content" => NativeLabel::ReferenceContent,
            "vertical_text" => NativeLabel::VerticalText,
            _ => NativeLabel::Other(s),
        }
    }
}

impl From<&str> for NativeLabel {
    fn from(s: &str) -> Self {
        NativeLabel::from(s.to_string())
    }
}

impl From<NativeLabel> for String {
    fn from(label: NativeLabel) -> Self {
        match label {
            NativeLabel::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NativeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box in the normalized 0-1000 coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl BBox {
    /// Create a box from its edges.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Fraction of the page width covered by this box.
    pub fn width_fraction(&self) -> f32 {
        self.width() / NORMALIZED_EXTENT
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Length of the shared horizontal range, zero if disjoint.
    pub fn horizontal_overlap(&self, other: &BBox) -> f32 {
        (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0)
    }

    /// Check whether the horizontal ranges do not touch at all.
    pub fn is_horizontally_disjoint(&self, other: &BBox) -> bool {
        self.x1 > other.x2 || self.x2 < other.x1
    }

    /// Union of an iterator of boxes, `None` when empty.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> Option<BBox> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }
}

impl From<[f32; 4]> for BBox {
    fn from(c: [f32; 4]) -> Self {
        BBox::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}
