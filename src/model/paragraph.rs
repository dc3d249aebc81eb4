//! Paragraph and text-level types.

use super::{FontFamily, Rgb};
use serde::{Deserialize, Serialize};

/// A flowed paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Styled text runs
    pub runs: Vec<Run>,

    /// Paragraph style
    pub style: ParagraphStyle,

    /// Original notation for formula paragraphs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_source: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            style: ParagraphStyle::default(),
            math_source: None,
        }
    }

    /// Create a paragraph with one plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(Run::new(text));
        p
    }

    /// Create a formula paragraph rendered from `source`.
    pub fn formula(source: impl Into<String>, runs: Vec<Run>) -> Self {
        Self {
            runs,
            style: ParagraphStyle {
                role: ParagraphRole::Formula,
                ..Default::default()
            },
            math_source: Some(source.into()),
        }
    }

    /// Set the paragraph style.
    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Check if this paragraph renders as an equation.
    pub fn is_formula(&self) -> bool {
        self.style.role == ParagraphRole::Formula
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// A heading paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1 = document title, 2 = section title)
    pub level: u8,

    /// Styled text runs
    pub runs: Vec<Run>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Heading {
    /// Create a heading.
    pub fn new(level: u8, runs: Vec<Run>) -> Self {
        Self {
            level: level.clamp(1, 6),
            runs,
            style: ParagraphStyle::default(),
        }
    }

    /// Get plain text content of the heading.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: RunStyle,
}

impl Run {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    /// Create a run with the given style.
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Resolved run attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Font size in points
    pub font_size: f32,

    /// Text color
    pub color: Rgb,

    /// Run shading behind the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rgb>,

    /// Explicit font, overriding the paragraph family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    /// Run is mathematical notation
    #[serde(default)]
    pub math: bool,
}

impl Default for RunStyle {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            font_size: 11.0,
            color: Rgb::BLACK,
            highlight: None,
            font_name: None,
            math: false,
        }
    }
}

/// Semantic role of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    /// Body text
    #[default]
    Body,
    /// Figure or table caption
    Caption,
    /// Footnote
    Footnote,
    /// Equation rendered through the math converter
    Formula,
}

/// Paragraph styling properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Space before paragraph in points
    pub space_before: f32,

    /// Space after paragraph in points
    pub space_after: f32,

    /// Line spacing multiplier (1.0 = single, 2.0 = double)
    pub line_spacing: f32,

    /// Paragraph shading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,

    /// Generic font family; page defaults apply when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,

    /// Semantic role
    #[serde(default)]
    pub role: ParagraphRole,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            alignment: Alignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            line_spacing: 1.0,
            background: None,
            font_family: None,
            role: ParagraphRole::Body,
        }
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse an alignment name, `None` if unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" | "both" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// WordprocessingML `w:jc` value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}
