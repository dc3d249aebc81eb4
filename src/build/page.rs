//! Page tree construction.
//!
//! A page is built from its regions in a fixed order: flow content, then
//! side-by-side groups, then text-box groups, then floating images.

use super::floating::FloatingLayout;
use super::options::BuildOptions;
use super::runs::{restyle, split_runs};
use super::style::StyleTable;
use super::table::reconstruct_table;
use crate::error::Result;
use crate::math::{self, NotationIssue, PreparedText, MATH_FONT};
use crate::model::{
    Alignment, AssetRef, BBox, EffectiveStyle, Heading, ImageNode, NativeLabel, Node, Page,
    Paragraph, ParagraphRole, ParagraphStyle, Region, Run, RunStyle, SideBySideGroup,
    StructuralLabel, TextFrame,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HEADING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+").expect("Invalid heading prefix regex"));

/// Parse one page's region list.
pub fn parse_regions(json: &str) -> Result<Vec<Region>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a whole document's regions: a list of pages, each a region list.
pub fn parse_document_regions(json: &str) -> Result<Vec<Vec<Region>>> {
    Ok(serde_json::from_str(json)?)
}

/// Everything the builder needs for one page.
#[derive(Debug, Clone, Default)]
pub struct PageSource {
    /// Regions in OCR order
    pub regions: Vec<Region>,

    /// Style overrides keyed by region index
    pub styles: StyleTable,
}

impl PageSource {
    /// Create a source without style hints.
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            styles: StyleTable::default(),
        }
    }

    /// Attach style hints.
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self
    }

    /// Load a page from region JSON and optional style JSON.
    pub fn from_json(regions: &str, styles: Option<&str>) -> Result<Self> {
        let regions = parse_regions(regions)?;
        let styles = match styles {
            Some(json) => StyleTable::from_json(json)?,
            None => StyleTable::default(),
        };
        Ok(Self { regions, styles })
    }
}

/// A built page and the notation issues found while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBuild {
    /// The page tree
    pub page: Page,

    /// Leftover notation in non-formula text
    pub issues: Vec<NotationIssue>,
}

/// Builds page trees from regions and style hints.
#[derive(Debug, Clone, Copy)]
pub struct PageBuilder<'a> {
    options: &'a BuildOptions,
}

impl<'a> PageBuilder<'a> {
    /// Create a builder.
    pub fn new(options: &'a BuildOptions) -> Self {
        Self { options }
    }

    /// Build page `number` (1-indexed).
    pub fn build(&self, number: u32, source: &PageSource) -> PageBuild {
        let styles: HashMap<u32, EffectiveStyle> = source
            .regions
            .iter()
            .map(|r| (r.index, source.styles.resolve(r)))
            .collect();
        let style_of = |region: &Region| {
            styles
                .get(&region.index)
                .cloned()
                .unwrap_or_else(|| source.styles.resolve(region))
        };

        let layout = FloatingLayout::detect(
            &source.regions,
            |r| styles.get(&r.index).is_some_and(|s| s.text_box),
            &self.options.floating,
        );

        let mut ctx = PageContext {
            page: Page::new(number, self.options.geometry.clone()),
            issues: Vec::new(),
            image_counter: 0,
            validate: self.options.validate_notation,
        };

        for &region in &layout.flow {
            let style = style_of(region);
            match region.label {
                StructuralLabel::Text | StructuralLabel::Formula => {
                    if let Some(node) = ctx.text_node(region, &style) {
                        ctx.page.add_node(node);
                    }
                }
                StructuralLabel::Table => {
                    match reconstruct_table(&region.content, &style, region.bbox) {
                        Some(grid) => ctx.page.add_node(Node::Table(grid)),
                        None => log::debug!(
                            "Page {}: table region {} has no usable grid",
                            number,
                            region.index
                        ),
                    }
                }
                StructuralLabel::Image => {
                    let image = ctx.image_node(region, false);
                    ctx.page.add_node(image);
                }
                StructuralLabel::Other => {
                    log::debug!(
                        "Page {}: region {} with unknown label skipped",
                        number,
                        region.index
                    );
                }
            }
        }

        for group in &layout.side_by_side {
            match group.as_slice() {
                &[single] => {
                    let style = style_of(single);
                    if let Some(frame) = ctx.frame(&[(single, style)]) {
                        ctx.page.add_node(frame);
                    }
                }
                members => {
                    let columns = members
                        .iter()
                        .map(|&region| ctx.column(region, &style_of(region)))
                        .collect();
                    ctx.page
                        .add_node(Node::SideBySide(SideBySideGroup { columns }));
                }
            }
        }

        for group in &layout.text_boxes {
            let members: Vec<(&Region, EffectiveStyle)> =
                group.iter().map(|&r| (r, style_of(r))).collect();
            if let Some(frame) = ctx.frame(&members) {
                ctx.page.add_node(frame);
            }
        }

        for &region in &layout.floating_images {
            let image = ctx.image_node(region, true);
            ctx.page.add_node(image);
        }

        log::debug!(
            "Page {}: {} node(s) from {} region(s)",
            number,
            ctx.page.node_count(),
            source.regions.len()
        );

        PageBuild {
            page: ctx.page,
            issues: ctx.issues,
        }
    }
}

struct PageContext {
    page: Page,
    issues: Vec<NotationIssue>,
    image_counter: u32,
    validate: bool,
}

impl PageContext {
    /// Classify and clean text, recording leftover notation.
    fn prepare(&mut self, region: &Region, content: &str) -> PreparedText {
        let prepared = math::prepare_content(content, &region.native_label);
        if self.validate && !prepared.is_math {
            for (kind, matches) in math::find_artifacts(&prepared.text) {
                log::warn!(
                    "Notation artifact {} in page {}, region {}: {:?}",
                    kind.as_str(),
                    self.page.number,
                    region.index,
                    matches
                );
                self.issues.push(NotationIssue {
                    page: self.page.number,
                    region_index: region.index,
                    kind,
                    matches,
                });
            }
        }
        prepared
    }

    fn text_node(&mut self, region: &Region, style: &EffectiveStyle) -> Option<Node> {
        let prepared = self.prepare(region, &region.content);
        if prepared.text.trim().is_empty() {
            log::debug!(
                "Page {}: region {} has no text",
                self.page.number,
                region.index
            );
            return None;
        }

        if let Some(level) = region.native_label.heading_level() {
            let text = HEADING_PREFIX.replace(&prepared.text, "");
            let mut runs = split_runs(&text, &run_style(style));
            if region.native_label == NativeLabel::DocTitle {
                restyle(&mut runs, |s| s.bold = true);
            }
            let mut heading = Heading::new(level, runs);
            heading.style = paragraph_style(style, ParagraphRole::Body);
            return Some(Node::Heading(heading));
        }

        if prepared.is_math {
            let mut runs = vec![Run::styled(prepared.text.as_str(), run_style(style))];
            restyle(&mut runs, |s| {
                s.font_name = Some(MATH_FONT.to_string());
                s.math = true;
            });
            let paragraph = Paragraph::formula(prepared.text, runs)
                .with_style(paragraph_style(style, ParagraphRole::Formula));
            return Some(Node::Paragraph(paragraph));
        }

        let role = match region.native_label {
            NativeLabel::FigureTitle => ParagraphRole::Caption,
            NativeLabel::VisionFootnote => ParagraphRole::Footnote,
            _ => ParagraphRole::Body,
        };
        let mut paragraph = Paragraph::new().with_style(paragraph_style(style, role));
        paragraph.runs = split_runs(&prepared.text, &run_style(style));
        Some(Node::Paragraph(paragraph))
    }

    fn image_node(&mut self, region: &Region, floating: bool) -> Node {
        let asset = AssetRef::new(self.page.index(), self.image_counter);
        self.image_counter += 1;
        Node::Image(ImageNode {
            asset,
            bbox: region.bbox,
            floating,
            alignment: Alignment::Center,
        })
    }

    /// One text frame over the union of the members' boxes, one paragraph
    /// per member.
    fn frame(&mut self, members: &[(&Region, EffectiveStyle)]) -> Option<Node> {
        let bbox = BBox::union_all(members.iter().filter_map(|(r, _)| r.bbox.as_ref()))?;
        let border = members.iter().any(|(_, style)| style.border);
        let paragraphs = members
            .iter()
            .map(|(region, style)| {
                let prepared = self.prepare(region, &region.content);
                let mut paragraph = Paragraph::new().with_style(ParagraphStyle {
                    alignment: style.alignment,
                    ..Default::default()
                });
                paragraph.runs = split_runs(&prepared.text, &run_style(style));
                paragraph
            })
            .collect();
        Some(Node::TextFrame(TextFrame {
            bbox,
            paragraphs,
            border,
        }))
    }

    /// One paragraph per non-empty line of the region.
    fn column(&mut self, region: &Region, style: &EffectiveStyle) -> Vec<Paragraph> {
        let base = run_style(style);
        region
            .content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let prepared = self.prepare(region, line);
                if prepared.text.is_empty() {
                    return None;
                }
                let mut paragraph = Paragraph::new();
                paragraph.runs = split_runs(&prepared.text, &base);
                Some(paragraph)
            })
            .collect()
    }
}

fn run_style(style: &EffectiveStyle) -> RunStyle {
    RunStyle {
        bold: style.bold,
        italic: false,
        font_size: style.font_size,
        color: style.color,
        highlight: None,
        font_name: None,
        math: false,
    }
}

fn paragraph_style(style: &EffectiveStyle, role: ParagraphRole) -> ParagraphStyle {
    ParagraphStyle {
        alignment: style.alignment,
        space_before: style.space_before,
        space_after: style.space_after,
        line_spacing: style.line_spacing,
        background: style.background,
        font_family: Some(style.font_family),
        role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontFamily, Rgb, StyleOverride};

    fn build(source: &PageSource) -> PageBuild {
        let options = BuildOptions::default();
        PageBuilder::new(&options).build(1, source)
    }

    fn region(index: u32, label: StructuralLabel, native: &str, content: &str) -> Region {
        Region::new(index, label, NativeLabel::from(native)).with_content(content)
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let source = PageSource::new(vec![
            region(0, StructuralLabel::Text, "doc_title", "# Annual *Report*"),
            region(1, StructuralLabel::Text, "paragraph_title", "## Summary"),
            region(2, StructuralLabel::Text, "text", "Body with **bold** text."),
            region(3, StructuralLabel::Text, "figure_title", "Figure 1"),
        ]);
        let built = build(&source);
        let nodes = &built.page.nodes;
        assert_eq!(nodes.len(), 4);

        match &nodes[0] {
            Node::Heading(h) => {
                assert_eq!(h.level, 1);
                assert_eq!(h.plain_text(), "Annual Report");
                assert!(h.runs.iter().all(|r| r.style.bold));
                assert!(h.runs[1].style.italic);
                assert_eq!(h.style.alignment, Alignment::Center);
            }
            other => panic!("expected heading, got {}", other.kind()),
        }
        match &nodes[1] {
            Node::Heading(h) => {
                assert_eq!(h.level, 2);
                assert_eq!(h.plain_text(), "Summary");
            }
            other => panic!("expected heading, got {}", other.kind()),
        }
        match &nodes[2] {
            Node::Paragraph(p) => {
                assert_eq!(p.plain_text(), "Body with bold text.");
                assert_eq!(p.style.font_family, Some(FontFamily::Serif));
                assert_eq!(p.style.role, ParagraphRole::Body);
            }
            other => panic!("expected paragraph, got {}", other.kind()),
        }
        match &nodes[3] {
            Node::Paragraph(p) => assert_eq!(p.style.role, ParagraphRole::Caption),
            other => panic!("expected paragraph, got {}", other.kind()),
        }
    }

    #[test]
    fn test_formula_paragraph_keeps_source() {
        let source = PageSource::new(vec![
            region(0, StructuralLabel::Formula, "display_formula", r"$\frac{a}{b}$"),
            region(1, StructuralLabel::Text, "text", r"Ratio is $\frac{a}{b}$ here"),
        ]);
        let built = build(&source);
        match &built.page.nodes[0] {
            Node::Paragraph(p) => {
                assert!(p.is_formula());
                assert_eq!(p.math_source.as_deref(), Some(r"$\frac{a}{b}$"));
                assert!(p.runs.iter().all(|r| r.style.math));
                assert_eq!(p.runs[0].style.font_name.as_deref(), Some(MATH_FONT));
            }
            other => panic!("expected paragraph, got {}", other.kind()),
        }
        assert_eq!(built.page.nodes[1].plain_text(), "Ratio is a/b here");
        assert!(built.issues.is_empty());
    }

    #[test]
    fn test_style_overrides_flow_into_nodes() {
        let mut styles = StyleTable::new();
        styles.insert(
            0,
            StyleOverride {
                color: Some(Rgb(200, 0, 0)),
                background: Some(Rgb(240, 240, 240)),
                font_family: Some(FontFamily::Sans),
                ..Default::default()
            },
        );
        let source =
            PageSource::new(vec![Region::text(0, "Styled")]).with_styles(styles);
        let built = build(&source);
        match &built.page.nodes[0] {
            Node::Paragraph(p) => {
                assert_eq!(p.style.background, Some(Rgb(240, 240, 240)));
                assert_eq!(p.style.font_family, Some(FontFamily::Sans));
                assert_eq!(p.runs[0].style.color, Rgb(200, 0, 0));
            }
            other => panic!("expected paragraph, got {}", other.kind()),
        }
    }

    #[test]
    fn test_tables_and_images() {
        let source = PageSource::new(vec![
            region(0, StructuralLabel::Image, "image", "").with_bbox([100.0, 100.0, 500.0, 300.0]),
            region(1, StructuralLabel::Table, "table", "<table><tr><td>a</td></tr></table>"),
            region(2, StructuralLabel::Table, "table", "no table here"),
            region(3, StructuralLabel::Image, "image", ""),
            region(4, StructuralLabel::Other, "seal", "stamp"),
        ]);
        let mut options = BuildOptions::default();
        options.geometry.width_pt = 612.0;
        let built = PageBuilder::new(&options).build(3, &source);
        let kinds: Vec<&str> = built.page.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["image", "table", "image"]);

        match (&built.page.nodes[0], &built.page.nodes[2]) {
            (Node::Image(first), Node::Image(second)) => {
                assert_eq!(first.asset.relative_path(), "imgs/cropped_page2_idx0.jpg");
                assert_eq!(second.asset.counter, 1);
                assert!(!first.floating);
                assert_eq!(first.alignment, Alignment::Center);
            }
            _ => panic!("expected images"),
        }
        assert_eq!(built.page.geometry.width_pt, 612.0);
    }

    #[test]
    fn test_floating_emission_order() {
        let mut styles = StyleTable::new();
        for index in [3, 4] {
            styles.insert(
                index,
                StyleOverride {
                    text_box: Some(true),
                    border: Some(index == 4),
                    ..Default::default()
                },
            );
        }
        let source = PageSource::new(vec![
            Region::text(0, "Left column\n\nsecond line").with_bbox([100.0, 200.0, 400.0, 260.0]),
            Region::text(1, "Right column").with_bbox([500.0, 210.0, 900.0, 270.0]),
            Region::text(2, "Flow paragraph").with_bbox([100.0, 500.0, 900.0, 550.0]),
            Region::text(3, "Box top").with_bbox([100.0, 700.0, 400.0, 750.0]),
            Region::text(4, "Box bottom").with_bbox([100.0, 760.0, 400.0, 800.0]),
            region(5, StructuralLabel::Image, "image", "").with_bbox([150.0, 710.0, 350.0, 740.0]),
        ])
        .with_styles(styles);
        let built = build(&source);
        let kinds: Vec<&str> = built.page.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["paragraph", "side_by_side", "text_frame", "image"]);

        match &built.page.nodes[1] {
            Node::SideBySide(group) => {
                assert_eq!(group.columns.len(), 2);
                assert_eq!(group.columns[0].len(), 2);
                assert_eq!(group.row_count(), 2);
            }
            other => panic!("expected side-by-side, got {}", other.kind()),
        }
        match &built.page.nodes[2] {
            Node::TextFrame(frame) => {
                assert_eq!(frame.bbox, BBox::new(100.0, 700.0, 400.0, 800.0));
                assert_eq!(frame.paragraphs.len(), 2);
                assert!(frame.border);
                assert_eq!(frame.paragraphs[0].style.font_family, None);
            }
            other => panic!("expected text frame, got {}", other.kind()),
        }
        match &built.page.nodes[3] {
            Node::Image(image) => assert!(image.floating),
            other => panic!("expected image, got {}", other.kind()),
        }
    }

    #[test]
    fn test_boxed_partner_leaves_region_in_flow() {
        // 1 would pair with 0, but 0 is boxed first.
        let mut styles = StyleTable::new();
        styles.insert(
            0,
            StyleOverride {
                text_box: Some(true),
                ..Default::default()
            },
        );
        let source = PageSource::new(vec![
            Region::text(0, "boxed").with_bbox([0.0, 100.0, 200.0, 150.0]),
            Region::text(1, "middle").with_bbox([300.0, 100.0, 500.0, 150.0]),
            Region::text(2, "far").with_bbox([600.0, 400.0, 800.0, 450.0]),
        ])
        .with_styles(styles);
        let built = build(&source);
        let kinds: Vec<&str> = built.page.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, vec!["paragraph", "paragraph", "text_frame"]);
    }

    #[test]
    fn test_notation_issues_recorded() {
        let source = PageSource::new(vec![Region::text(7, r"Value \sqrt{2} and \emph{x}")]);
        // \sqrt marks the region as math, so no issue is recorded for it.
        assert!(build(&source).issues.is_empty());

        let source = PageSource::new(vec![Region::text(7, r"Value \emph{x}")]);
        let built = build(&source);
        assert_eq!(built.issues.len(), 1);
        assert_eq!(built.issues[0].region_index, 7);
        assert_eq!(built.issues[0].kind.as_str(), "latex_command");
        assert_eq!(built.page.nodes[0].plain_text(), r"Value \emph{x}");

        let options = BuildOptions::default().with_validation(false);
        assert!(PageBuilder::new(&options).build(1, &source).issues.is_empty());
    }

    #[test]
    fn test_parse_regions_json() {
        let regions = parse_regions(
            r#"[
                {"index": 0, "label": "text", "native_label": "doc_title",
                 "bbox_2d": [10, 20, 990, 80], "content": "Title"},
                {"index": 1, "label": "chart", "bbox": [0, 0, 10, 10]},
                {"index": 2, "label": "table"}
            ]"#,
        )
        .unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].native_label, NativeLabel::DocTitle);
        assert_eq!(regions[1].label, StructuralLabel::Other);
        assert!(regions[1].bbox.is_some());
        assert_eq!(regions[2].native_label, NativeLabel::Text);
        assert!(regions[2].content.is_empty());

        let pages = parse_document_regions(r#"[[{"index": 0, "label": "text"}], []]"#).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(parse_regions("{").is_err());
    }

    #[test]
    fn test_page_source_from_json() {
        let source = PageSource::from_json(
            r#"[{"index": 0, "label": "text", "content": "x"}]"#,
            Some(r#"[{"i": 0, "fs": 20}]"#),
        )
        .unwrap();
        assert_eq!(source.styles.len(), 1);
        let built = build(&source);
        match &built.page.nodes[0] {
            Node::Paragraph(p) => assert_eq!(p.runs[0].style.font_size, 20.0),
            other => panic!("expected paragraph, got {}", other.kind()),
        }
    }
}
