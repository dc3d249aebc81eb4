//! Headings, paragraphs, runs, frames, and section properties.

use super::fonts::{has_cjk, resolve_fonts, FontPair};
use super::omml::write_omml;
use super::units::{cm_to_twips, norm_x_pt, norm_y_pt, pt_to_twips};
use super::xml::XmlSink;
use super::PageWriter;
use crate::error::Result;
use crate::math::parse_expression;
use crate::model::{Alignment, BBox, Heading, PageGeometry, Paragraph, Rgb, Run, TextFrame};

/// Absolute frame position and size in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct FrameBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl FrameBox {
    /// Map a normalized box onto the page.
    pub fn from_bbox(bbox: &BBox, geometry: &PageGeometry) -> Self {
        Self {
            x: pt_to_twips(norm_x_pt(bbox.x1, geometry)),
            y: pt_to_twips(norm_y_pt(bbox.y1, geometry)),
            w: pt_to_twips(norm_x_pt(bbox.width(), geometry)).max(1),
            h: pt_to_twips(norm_y_pt(bbox.height(), geometry)).max(1),
        }
    }
}

/// Paragraph properties, written in schema order.
#[derive(Debug, Clone, Default)]
pub(super) struct ParagraphProps<'s> {
    pub style_id: Option<&'s str>,
    pub frame: Option<FrameBox>,
    pub border: bool,
    pub background: Option<Rgb>,
    pub before_pt: f32,
    pub after_pt: f32,
    pub line_spacing: Option<f32>,
    pub alignment: Option<Alignment>,
}

impl<'s> ParagraphProps<'s> {
    /// Tight properties used inside tables and frames.
    pub fn compact(alignment: Option<Alignment>) -> Self {
        Self {
            line_spacing: Some(1.0),
            alignment,
            ..Default::default()
        }
    }

    pub(super) fn write(&self, sink: &mut XmlSink) -> Result<()> {
        sink.start("w:pPr", &[])?;
        if let Some(id) = self.style_id {
            sink.empty("w:pStyle", &[("w:val", id)])?;
        }
        if let Some(frame) = self.frame {
            let (w, h, x, y) = (
                frame.w.to_string(),
                frame.h.to_string(),
                frame.x.to_string(),
                frame.y.to_string(),
            );
            sink.empty(
                "w:framePr",
                &[
                    ("w:w", w.as_str()),
                    ("w:h", h.as_str()),
                    ("w:hRule", "exact"),
                    ("w:wrap", "notBeside"),
                    ("w:hAnchor", "page"),
                    ("w:vAnchor", "page"),
                    ("w:x", x.as_str()),
                    ("w:y", y.as_str()),
                ],
            )?;
        }
        if self.border {
            sink.start("w:pBdr", &[])?;
            for side in ["w:top", "w:left", "w:bottom", "w:right"] {
                sink.empty(
                    side,
                    &[
                        ("w:val", "single"),
                        ("w:sz", "4"),
                        ("w:space", "1"),
                        ("w:color", "000000"),
                    ],
                )?;
            }
            sink.end("w:pBdr")?;
        }
        if let Some(fill) = self.background {
            shading(sink, fill)?;
        }

        let before = pt_to_twips(self.before_pt).to_string();
        let after = pt_to_twips(self.after_pt).to_string();
        match self.line_spacing {
            Some(ls) => {
                let line = ((ls * 240.0).round() as i64).to_string();
                sink.empty(
                    "w:spacing",
                    &[
                        ("w:before", before.as_str()),
                        ("w:after", after.as_str()),
                        ("w:line", line.as_str()),
                        ("w:lineRule", "auto"),
                    ],
                )?;
            }
            None => sink.empty(
                "w:spacing",
                &[("w:before", before.as_str()), ("w:after", after.as_str())],
            )?,
        }

        if let Some(alignment) = self.alignment {
            sink.empty("w:jc", &[("w:val", alignment.as_ooxml())])?;
        }
        sink.end("w:pPr")
    }
}

/// `w:shd` with a solid fill.
pub(super) fn shading(sink: &mut XmlSink, fill: Rgb) -> Result<()> {
    let hex = fill.hex();
    sink.empty(
        "w:shd",
        &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", hex.as_str())],
    )
}

/// Write one run. Newlines become `w:br`.
pub(super) fn write_run(sink: &mut XmlSink, run: &Run, fonts: FontPair<'_>) -> Result<()> {
    if run.text.is_empty() {
        return Ok(());
    }
    let style = &run.style;
    let cjk = has_cjk(&run.text);
    let latin = style.font_name.as_deref().unwrap_or(fonts.latin);
    let east_asia = style.font_name.as_deref().unwrap_or(fonts.cjk);

    sink.start("w:r", &[])?;
    sink.start("w:rPr", &[])?;
    if cjk {
        sink.empty(
            "w:rFonts",
            &[
                ("w:ascii", latin),
                ("w:hAnsi", latin),
                ("w:eastAsia", east_asia),
            ],
        )?;
    } else {
        sink.empty("w:rFonts", &[("w:ascii", latin), ("w:hAnsi", latin)])?;
    }
    if style.bold {
        sink.empty("w:b", &[])?;
    }
    if style.italic {
        sink.empty("w:i", &[])?;
    }
    let color = style.color.hex();
    sink.empty("w:color", &[("w:val", color.as_str())])?;
    let size = ((style.font_size * 2.0).round() as i64).to_string();
    sink.empty("w:sz", &[("w:val", size.as_str())])?;
    sink.empty("w:szCs", &[("w:val", size.as_str())])?;
    if let Some(highlight) = style.highlight {
        shading(sink, highlight)?;
    }
    sink.end("w:rPr")?;

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            sink.empty("w:br", &[])?;
        }
        if !line.is_empty() {
            sink.leaf("w:t", &[("xml:space", "preserve")], line)?;
        }
    }
    sink.end("w:r")
}

/// Write a full paragraph from properties and runs.
pub(super) fn write_paragraph(
    sink: &mut XmlSink,
    props: &ParagraphProps<'_>,
    runs: &[Run],
    fonts: FontPair<'_>,
) -> Result<()> {
    sink.start("w:p", &[])?;
    props.write(sink)?;
    for run in runs {
        write_run(sink, run, fonts)?;
    }
    sink.end("w:p")
}

/// Separate paragraph holding a page break.
pub(super) fn page_break(sink: &mut XmlSink) -> Result<()> {
    sink.start("w:p", &[])?;
    sink.start("w:r", &[])?;
    sink.empty("w:br", &[("w:type", "page")])?;
    sink.end("w:r")?;
    sink.end("w:p")
}

/// `w:sectPr` with page size and margins.
pub(super) fn section_properties(sink: &mut XmlSink, geometry: &PageGeometry) -> Result<()> {
    let w = pt_to_twips(geometry.width_pt).to_string();
    let h = pt_to_twips(geometry.height_pt).to_string();
    let margins = &geometry.margins;
    let top = cm_to_twips(margins.top).to_string();
    let bottom = cm_to_twips(margins.bottom).to_string();
    let left = cm_to_twips(margins.left).to_string();
    let right = cm_to_twips(margins.right).to_string();

    sink.start("w:sectPr", &[])?;
    if geometry.is_landscape() {
        sink.empty(
            "w:pgSz",
            &[("w:w", w.as_str()), ("w:h", h.as_str()), ("w:orient", "landscape")],
        )?;
    } else {
        sink.empty("w:pgSz", &[("w:w", w.as_str()), ("w:h", h.as_str())])?;
    }
    sink.empty(
        "w:pgMar",
        &[
            ("w:top", top.as_str()),
            ("w:right", right.as_str()),
            ("w:bottom", bottom.as_str()),
            ("w:left", left.as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    sink.end("w:sectPr")
}

impl PageWriter<'_> {
    pub(super) fn heading(&mut self, heading: &Heading) -> Result<()> {
        let style_id = if heading.level <= 1 { "Heading1" } else { "Heading2" };
        let props = ParagraphProps {
            style_id: Some(style_id),
            background: heading.style.background,
            before_pt: heading.style.space_before,
            after_pt: heading.style.space_after,
            alignment: Some(heading.style.alignment),
            ..Default::default()
        };
        let fonts = resolve_fonts(heading.style.font_family, self.geometry);
        write_paragraph(self.sink, &props, &heading.runs, fonts)
    }

    pub(super) fn paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        let style = &paragraph.style;
        let props = ParagraphProps {
            background: style.background,
            before_pt: style.space_before,
            after_pt: style.space_after,
            line_spacing: Some(style.line_spacing),
            alignment: Some(style.alignment),
            ..Default::default()
        };
        let fonts = resolve_fonts(style.font_family, self.geometry);

        if let Some(source) = paragraph.math_source.as_deref() {
            let nodes = parse_expression(source);
            if !nodes.is_empty() {
                self.sink.start("w:p", &[])?;
                props.write(self.sink)?;
                write_omml(self.sink, &nodes)?;
                self.sink.end("w:p")?;
                self.stats.equations += 1;
                return Ok(());
            }
        }
        write_paragraph(self.sink, &props, &paragraph.runs, fonts)
    }

    pub(super) fn text_frame(&mut self, frame: &TextFrame) -> Result<()> {
        let frame_box = FrameBox::from_bbox(&frame.bbox, self.geometry);
        if frame.paragraphs.is_empty() {
            let props = ParagraphProps {
                frame: Some(frame_box),
                border: frame.border,
                ..ParagraphProps::compact(None)
            };
            return write_paragraph(self.sink, &props, &[], resolve_fonts(None, self.geometry));
        }

        for paragraph in &frame.paragraphs {
            let props = ParagraphProps {
                frame: Some(frame_box),
                border: frame.border,
                ..ParagraphProps::compact(Some(paragraph.style.alignment))
            };
            let fonts = resolve_fonts(paragraph.style.font_family, self.geometry);
            write_paragraph(self.sink, &props, &paragraph.runs, fonts)?;
        }
        Ok(())
    }
}
