//! Page-level types.

use super::{Alignment, AssetRef, BBox, Heading, Paragraph, TableGrid};
use serde::{Deserialize, Serialize};

/// A single page of the rebuilt document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Physical size, margins, and default fonts
    pub geometry: PageGeometry,

    /// Nodes in render order
    pub nodes: Vec<Node>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, geometry: PageGeometry) -> Self {
        Self {
            number,
            geometry,
            nodes: Vec::new(),
        }
    }

    /// 0-based index of the page.
    pub fn index(&self) -> u32 {
        self.number.saturating_sub(1)
    }

    /// Add a node to the page.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| {
                let text = node.plain_text();
                (!text.is_empty()).then_some(text)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page is empty (no nodes).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes on the page.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Page size in points, margins in centimeters, and default fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width in points (1 point = 1/72 inch)
    #[serde(rename = "width")]
    pub width_pt: f32,

    /// Page height in points
    #[serde(rename = "height")]
    pub height_pt: f32,

    /// Page margins
    #[serde(flatten)]
    pub margins: Margins,

    /// Default Latin font
    pub font_latin: String,

    /// Default CJK font
    pub font_cjk: String,
}

impl PageGeometry {
    /// A4 portrait with default margins and fonts.
    pub fn a4() -> Self {
        Self {
            width_pt: 595.276,
            height_pt: 841.89,
            margins: Margins::default(),
            font_latin: "Arial".to_string(),
            font_cjk: "SimSun".to_string(),
        }
    }

    /// Custom page size with default margins and fonts.
    pub fn with_size(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
            ..Self::a4()
        }
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width_pt > self.height_pt
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Page margins in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin
    #[serde(rename = "margin_top")]
    pub top: f32,
    /// Bottom margin
    #[serde(rename = "margin_bottom")]
    pub bottom: f32,
    /// Left margin
    #[serde(rename = "margin_left")]
    pub left: f32,
    /// Right margin
    #[serde(rename = "margin_right")]
    pub right: f32,
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(cm: f32) -> Self {
        Self {
            top: cm,
            bottom: cm,
            left: cm,
            right: cm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(1.27)
    }
}

/// A node of the page tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Document or section title
    Heading(Heading),

    /// Body, caption, footnote, or formula paragraph
    Paragraph(Paragraph),

    /// Reconstructed table
    Table(TableGrid),

    /// Cropped image
    Image(ImageNode),

    /// Absolutely positioned text box
    TextFrame(TextFrame),

    /// Columns of text laid out side by side
    SideBySide(SideBySideGroup),
}

impl Node {
    /// Get plain text content of the node.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Heading(h) => h.plain_text(),
            Node::Paragraph(p) => p.plain_text(),
            Node::Table(t) => t.plain_text(),
            Node::Image(_) => String::new(),
            Node::TextFrame(f) => join_paragraphs(&f.paragraphs, "\n"),
            Node::SideBySide(g) => g
                .columns
                .iter()
                .map(|col| join_paragraphs(col, "\n"))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Heading(_) => "heading",
            Node::Paragraph(_) => "paragraph",
            Node::Table(_) => "table",
            Node::Image(_) => "image",
            Node::TextFrame(_) => "text_frame",
            Node::SideBySide(_) => "side_by_side",
        }
    }
}

fn join_paragraphs(paragraphs: &[Paragraph], sep: &str) -> String {
    paragraphs
        .iter()
        .map(|p| p.plain_text())
        .collect::<Vec<_>>()
        .join(sep)
}

/// An image placed from an external asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Asset to embed
    pub asset: AssetRef,

    /// Region bounding box
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,

    /// Anchored at an absolute page position instead of flowing
    #[serde(default)]
    pub floating: bool,

    /// Horizontal alignment when flowing
    pub alignment: Alignment,
}

/// A text box positioned absolutely on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    /// Union of the member regions' boxes
    pub bbox: BBox,

    /// One paragraph per member region, top to bottom
    pub paragraphs: Vec<Paragraph>,

    /// Draw a border around the frame
    pub border: bool,
}

/// Regions laid out as parallel columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideBySideGroup {
    /// One column per source region; one paragraph per non-empty line
    pub columns: Vec<Vec<Paragraph>>,
}

impl SideBySideGroup {
    /// Number of rows needed to hold the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }
}
