//! DOCX package assembly.
//!
//! [`DocxAssembler`] accepts finished pages one at a time, strictly in
//! ascending page order, and streams their nodes into `word/document.xml`.
//! Images are collected into a media store as they are met; everything
//! else in the package is written by [`DocxAssembler::finish`].
//!
//! Node rendering is split by concern: `text` handles headings, paragraphs,
//! runs, and frames; `table` handles grids and side-by-side groups;
//! `drawing` handles images; `omml` handles equations.

mod drawing;
mod fonts;
mod omml;
mod package;
mod table;
mod text;
pub mod units;
mod xml;

pub use fonts::{has_cjk, resolve_fonts, FontPair};

use self::drawing::MediaStore;
use self::xml::XmlSink;
use super::{AssemblyStats, DocxOutput, RenderOptions};
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Node, Page, PageGeometry};
use std::path::Path;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// Incremental DOCX writer.
pub struct DocxAssembler {
    options: RenderOptions,
    body: XmlSink,
    media: MediaStore,
    stats: AssemblyStats,
    section: Option<PageGeometry>,
    last_page: Option<u32>,
}

impl DocxAssembler {
    /// Start a new document.
    pub fn new(options: RenderOptions) -> Result<Self> {
        let mut body = XmlSink::new()?;
        body.start(
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
                ("xmlns:m", NS_M),
            ],
        )?;
        body.start("w:body", &[])?;

        Ok(Self {
            options,
            body,
            media: MediaStore::new(),
            stats: AssemblyStats::new(),
            section: None,
            last_page: None,
        })
    }

    /// Append a page. Pages must arrive in strictly ascending order.
    pub fn push_page(&mut self, page: &Page) -> Result<()> {
        if let Some(last) = self.last_page {
            if page.number <= last {
                return Err(Error::PageOrder {
                    expected_after: last,
                    got: page.number,
                });
            }
            text::page_break(&mut self.body)?;
        }

        let mut writer = PageWriter {
            sink: &mut self.body,
            media: &mut self.media,
            stats: &mut self.stats,
            geometry: &page.geometry,
            options: &self.options,
        };
        for node in &page.nodes {
            writer.node(node)?;
        }

        log::debug!("Assembled page {} ({} nodes)", page.number, page.node_count());
        self.stats.pages += 1;
        self.last_page = Some(page.number);
        if self.section.is_none() {
            self.section = Some(page.geometry.clone());
        }
        Ok(())
    }

    /// Statistics so far.
    pub fn stats(&self) -> &AssemblyStats {
        &self.stats
    }

    /// Close the body and build the package.
    pub fn finish(self) -> Result<DocxOutput> {
        let DocxAssembler {
            options,
            mut body,
            media,
            stats,
            section,
            ..
        } = self;

        let geometry = section.unwrap_or_default();
        text::section_properties(&mut body, &geometry)?;
        body.end("w:body")?;
        body.end("w:document")?;

        let bytes = package::write_package(
            body.into_bytes(),
            &media,
            &geometry,
            &options.metadata,
            &stats,
        )?;
        Ok(DocxOutput { bytes, stats })
    }

    /// Finish and write the package to a file.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<AssemblyStats> {
        let output = self.finish()?;
        output.save(path)?;
        Ok(output.stats)
    }
}

/// Render a whole document tree.
///
/// The document's own metadata is used unless the options carry some.
pub fn to_docx(doc: &Document, mut options: RenderOptions) -> Result<DocxOutput> {
    if options.metadata == Metadata::default() {
        options.metadata = doc.metadata.clone();
    }
    let mut assembler = DocxAssembler::new(options)?;
    for page in &doc.pages {
        assembler.push_page(page)?;
    }
    assembler.finish()
}

/// Per-page rendering state.
pub(crate) struct PageWriter<'a> {
    sink: &'a mut XmlSink,
    media: &'a mut MediaStore,
    stats: &'a mut AssemblyStats,
    geometry: &'a PageGeometry,
    options: &'a RenderOptions,
}

impl PageWriter<'_> {
    fn node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Heading(heading) => {
                self.heading(heading)?;
                self.stats.headings += 1;
            }
            Node::Paragraph(paragraph) => {
                self.paragraph(paragraph)?;
                self.stats.paragraphs += 1;
            }
            Node::Table(table) => {
                self.table(table)?;
                self.stats.tables += 1;
            }
            Node::Image(image) => self.image(image)?,
            Node::TextFrame(frame) => {
                self.text_frame(frame)?;
                self.stats.text_frames += 1;
            }
            Node::SideBySide(group) => {
                if self.side_by_side(group)? {
                    self.stats.side_by_side += 1;
                }
            }
        }
        Ok(())
    }
}
