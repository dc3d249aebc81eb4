//! Style hint and resolved style types.
//!
//! A [`StyleOverride`] is what the style service reports for a region: every
//! field is optional and an absent field means "keep the default", never
//! false or zero. An [`EffectiveStyle`] is the fully resolved result.

use super::Alignment;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Six-digit uppercase hex form used by WordprocessingML.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.0, c.1, c.2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Generic font family, mapped to a concrete Latin/CJK pair at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Sans-serif faces
    #[serde(alias = "sans-serif")]
    Sans,
    /// Monospaced faces
    #[serde(alias = "monospace")]
    Mono,
    /// Serif faces (also used for unknown names)
    #[default]
    #[serde(other)]
    Serif,
}

/// Table and cell border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Double line
    Double,
    /// Invisible borders
    None,
    /// Single line (also used for unknown names)
    #[default]
    #[serde(other)]
    Single,
}

/// Optional per-region style hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverride {
    /// Font size in points
    #[serde(rename = "font_size_pt", alias = "fs", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Bold text
    #[serde(alias = "b", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Paragraph alignment
    #[serde(
        alias = "a",
        deserialize_with = "lenient_alignment",
        skip_serializing_if = "Option::is_none"
    )]
    pub alignment: Option<Alignment>,

    /// Text color
    #[serde(rename = "color_rgb", alias = "c", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,

    /// Paragraph background shading
    #[serde(rename = "bg_rgb", alias = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,

    /// Generic font family
    #[serde(alias = "ff", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,

    /// Space before the paragraph in points
    #[serde(rename = "space_before_pt", alias = "sb", skip_serializing_if = "Option::is_none")]
    pub space_before: Option<f32>,

    /// Space after the paragraph in points
    #[serde(rename = "space_after_pt", alias = "sa", skip_serializing_if = "Option::is_none")]
    pub space_after: Option<f32>,

    /// Line spacing multiplier
    #[serde(alias = "ls", skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,

    /// Whether the first table row is a header
    #[serde(alias = "th", skip_serializing_if = "Option::is_none")]
    pub table_header: Option<bool>,

    /// Table border style
    #[serde(alias = "bs", skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,

    /// Region is an absolutely positioned text box
    #[serde(alias = "tb", skip_serializing_if = "Option::is_none")]
    pub text_box: Option<bool>,

    /// Text box draws a border
    #[serde(alias = "bd", skip_serializing_if = "Option::is_none")]
    pub border: Option<bool>,

    /// Column, row, cell, and keyword overrides for tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_overrides: Option<CellOverrides>,
}

impl StyleOverride {
    /// Replace exactly the fields present in this override.
    pub fn apply(&self, mut base: EffectiveStyle) -> EffectiveStyle {
        if let Some(v) = self.font_size {
            base.font_size = v;
        }
        if let Some(v) = self.bold {
            base.bold = v;
        }
        if let Some(v) = self.alignment {
            base.alignment = v;
        }
        if let Some(v) = self.color {
            base.color = v;
        }
        if let Some(v) = self.background {
            base.background = Some(v);
        }
        if let Some(v) = self.font_family {
            base.font_family = v;
        }
        if let Some(v) = self.space_before {
            base.space_before = v;
        }
        if let Some(v) = self.space_after {
            base.space_after = v;
        }
        if let Some(v) = self.line_spacing {
            base.line_spacing = v;
        }
        if let Some(v) = self.table_header {
            base.table_header = v;
        }
        if let Some(v) = self.border_style {
            base.border_style = v;
        }
        if let Some(v) = self.text_box {
            base.text_box = v;
        }
        if let Some(v) = self.border {
            base.border = v;
        }
        if let Some(ref v) = self.cell_overrides {
            base.cell_overrides = v.clone();
        }
        base
    }

    /// Check if no field is present.
    pub fn is_empty(&self) -> bool {
        *self == StyleOverride::default()
    }
}

fn lenient_alignment<'de, D>(deserializer: D) -> Result<Option<Alignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| Alignment::parse(&s)))
}

/// Fully resolved formatting for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStyle {
    /// Font size in points
    pub font_size: f32,
    /// Bold text
    pub bold: bool,
    /// Paragraph alignment
    pub alignment: Alignment,
    /// Text color
    pub color: Rgb,
    /// Paragraph background shading
    pub background: Option<Rgb>,
    /// Generic font family
    pub font_family: FontFamily,
    /// Space before in points
    pub space_before: f32,
    /// Space after in points
    pub space_after: f32,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// First table row is a header (when the table has more than one row)
    pub table_header: bool,
    /// Table border style
    pub border_style: BorderStyle,
    /// Region is a text box
    pub text_box: bool,
    /// Text box draws a border
    pub border: bool,
    /// Table cell overrides
    pub cell_overrides: CellOverrides,
}

impl EffectiveStyle {
    /// Body text defaults.
    pub fn body(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
            alignment: Alignment::Left,
            color: Rgb::BLACK,
            background: None,
            font_family: FontFamily::Serif,
            space_before: 0.0,
            space_after: 0.0,
            line_spacing: 1.0,
            table_header: true,
            border_style: BorderStyle::Single,
            text_box: false,
            border: false,
            cell_overrides: CellOverrides::default(),
        }
    }

    /// Set bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set alignment.
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set paragraph spacing.
    pub fn spaced(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }
}

/// Nested overrides for table cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellOverrides {
    /// Per-column overrides
    pub col_colors: Vec<ColorOverride>,
    /// Per-row overrides
    pub row_colors: Vec<ColorOverride>,
    /// Per-cell overrides
    pub cell_colors: Vec<ColorOverride>,
    /// Keyword highlights inside cells
    pub keyword_styles: Vec<KeywordStyle>,
}

impl CellOverrides {
    /// Check if there are no overrides at all.
    pub fn is_empty(&self) -> bool {
        self.col_colors.is_empty()
            && self.row_colors.is_empty()
            && self.cell_colors.is_empty()
            && self.keyword_styles.is_empty()
    }

    /// Override for a column; the last matching entry wins.
    pub fn column(&self, col: usize) -> Option<&ColorOverride> {
        self.col_colors
            .iter()
            .rev()
            .find(|e| e.col == Some(col as u32))
    }

    /// Override for a row; the last matching entry wins.
    pub fn row(&self, row: usize) -> Option<&ColorOverride> {
        self.row_colors
            .iter()
            .rev()
            .find(|e| e.row == Some(row as u32))
    }

    /// Override for a single cell; the last matching entry wins.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ColorOverride> {
        self.cell_colors
            .iter()
            .rev()
            .find(|e| e.row == Some(row as u32) && e.col == Some(col as u32))
    }

    /// Keyword styles targeting a cell, one per keyword (last entry wins).
    pub fn keywords(&self, row: usize, col: usize) -> Vec<&KeywordStyle> {
        let mut found: Vec<&KeywordStyle> = Vec::new();
        for entry in &self.keyword_styles {
            if entry.row != Some(row as u32)
                || entry.col != Some(col as u32)
                || entry.keyword.is_empty()
            {
                continue;
            }
            match found.iter_mut().find(|k| k.keyword == entry.keyword) {
                Some(slot) => *slot = entry,
                None => found.push(entry),
            }
        }
        found
    }
}

/// What an override entry is meant to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    /// Text color
    Text,
    /// Cell shading
    Bg,
    /// Unrecognized kind
    #[serde(other)]
    Other,
}

/// A column, row, or cell color override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverride {
    /// Target row (row and cell entries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    /// Target column (column and cell entries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    /// Text color
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Cell shading
    #[serde(rename = "bg", skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    /// Run highlight
    #[serde(rename = "text_bg", skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rgb>,
    /// Entry kind
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<OverrideKind>,
    /// Cell border override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,
}

impl ColorOverride {
    /// Text color this entry supplies; a `bg` entry never colors text.
    pub fn text_color(&self) -> Option<Rgb> {
        self.color.filter(|_| self.kind != Some(OverrideKind::Bg))
    }

    /// Shading this entry supplies.
    pub fn background(&self) -> Option<Rgb> {
        self.background
    }

    /// Highlight this entry supplies.
    pub fn highlight(&self) -> Option<Rgb> {
        self.highlight
    }

    /// Border this entry supplies.
    pub fn border(&self) -> Option<BorderStyle> {
        self.border
    }
}

/// Highlight for a keyword inside one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordStyle {
    /// Target row
    pub row: Option<u32>,
    /// Target column
    pub col: Option<u32>,
    /// Literal text to highlight
    pub keyword: String,
    /// Keyword text color
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Keyword bold flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Keyword highlight
    #[serde(rename = "text_bg", skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rgb>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(255, 0, 16).hex(), "FF0010");
        assert_eq!(Rgb::BLACK.to_string(), "#000000");
        let c: Rgb = serde_json::from_str("[217, 217, 217]").unwrap();
        assert_eq!(c, Rgb(217, 217, 217));
    }

    #[test]
    fn test_override_short_names() {
        let o: StyleOverride =
            serde_json::from_str(r#"{"fs": 12, "b": true, "a": "right", "c": [255, 0, 0]}"#)
                .unwrap();
        assert_eq!(o.font_size, Some(12.0));
        assert_eq!(o.bold, Some(true));
        assert_eq!(o.alignment, Some(Alignment::Right));
        assert_eq!(o.color, Some(Rgb(255, 0, 0)));
        assert_eq!(o.space_before, None);
    }

    #[test]
    fn test_override_expanded_names() {
        let o: StyleOverride = serde_json::from_str(
            r#"{"font_size_pt": 9.5, "font_family": "mono", "border_style": "double"}"#,
        )
        .unwrap();
        assert_eq!(o.font_size, Some(9.5));
        assert_eq!(o.font_family, Some(FontFamily::Mono));
        assert_eq!(o.border_style, Some(BorderStyle::Double));
    }

    #[test]
    fn test_override_lenient_enums() {
        let o: StyleOverride =
            serde_json::from_str(r#"{"a": "diagonal", "ff": "fantasy", "bs": "full"}"#).unwrap();
        assert_eq!(o.alignment, None);
        assert_eq!(o.font_family, Some(FontFamily::Serif));
        assert_eq!(o.border_style, Some(BorderStyle::Single));
    }

    #[test]
    fn test_unknown_font_family_falls_back_to_serif() {
        let family: FontFamily = serde_json::from_str("\"fantasy\"").unwrap();
        assert_eq!(family, FontFamily::Serif);
        let family: FontFamily = serde_json::from_str("\"sans-serif\"").unwrap();
        assert_eq!(family, FontFamily::Sans);
        assert_eq!(serde_json::to_string(&FontFamily::Serif).unwrap(), "\"serif\"");
    }

    #[test]
    fn test_unknown_border_style_falls_back_to_single() {
        let style: BorderStyle = serde_json::from_str("\"dotted\"").unwrap();
        assert_eq!(style, BorderStyle::Single);
        let style: BorderStyle = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(style, BorderStyle::None);
        assert_eq!(BorderStyle::default(), BorderStyle::Single);
    }

    #[test]
    fn test_apply_only_present_fields() {
        let base = EffectiveStyle::body(18.0).bold().aligned(Alignment::Center);
        let o = StyleOverride {
            alignment: Some(Alignment::Right),
            ..Default::default()
        };
        let resolved = o.apply(base.clone());
        assert_eq!(resolved.alignment, Alignment::Right);
        assert_eq!(resolved.font_size, 18.0);
        assert!(resolved.bold);

        let bold_off = StyleOverride {
            bold: Some(false),
            ..Default::default()
        };
        assert!(!bold_off.apply(base.clone()).bold);
        assert_eq!(StyleOverride::default().apply(base.clone()), base);
    }

    #[test]
    fn test_color_override_kind() {
        let entry = ColorOverride {
            color: Some(Rgb(1, 2, 3)),
            background: Some(Rgb(4, 5, 6)),
            kind: Some(OverrideKind::Bg),
            ..Default::default()
        };
        assert_eq!(entry.text_color(), None);
        assert_eq!(entry.background(), Some(Rgb(4, 5, 6)));

        let text = ColorOverride {
            kind: Some(OverrideKind::Text),
            ..entry
        };
        assert_eq!(text.text_color(), Some(Rgb(1, 2, 3)));
    }

    #[test]
    fn test_cell_overrides_lookup() {
        let overrides: CellOverrides = serde_json::from_str(
            r#"{
                "col_colors": [{"col": 1, "c": [1, 1, 1]}, {"col": 1, "c": [2, 2, 2]}],
                "row_colors": [{"row": 0, "bg": [9, 9, 9], "type": "bg"}],
                "keyword_styles": [
                    {"row": 0, "col": 1, "keyword": "up", "c": [0, 128, 0]},
                    {"row": 0, "col": 1, "keyword": "up", "c": [0, 0, 255]},
                    {"row": 0, "col": 1, "keyword": "", "c": [0, 0, 255]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(overrides.column(1).unwrap().color, Some(Rgb(2, 2, 2)));
        assert!(overrides.column(0).is_none());
        assert_eq!(overrides.row(0).unwrap().background, Some(Rgb(9, 9, 9)));
        assert!(overrides.cell(0, 1).is_none());

        let keywords = overrides.keywords(0, 1);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].color, Some(Rgb(0, 0, 255)));
    }
}
