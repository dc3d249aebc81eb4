//! # redocx
//!
//! Rebuilds editable DOCX documents from OCR layout output.
//!
//! Each page arrives as an ordered list of detected regions (text, tables,
//! images, formulas) with optional per-region style hints. The crate
//! resolves those into a styled page tree, then assembles the tree into a
//! word-processing package.
//!
//! ## Quick Start
//!
//! ```
//! use redocx::{convert_to_docx, ConvertOptions, PageSource};
//!
//! let regions = r#"[
//!     {"index": 0, "label": "text", "native_label": "doc_title",
//!      "bbox_2d": [100, 40, 900, 90], "content": "Quarterly Report"},
//!     {"index": 1, "label": "text", "native_label": "text",
//!      "bbox_2d": [100, 120, 900, 300], "content": "Revenue grew 12% in Q3."}
//! ]"#;
//! let styles = r#"[{"i": 1, "a": "justify"}]"#;
//!
//! let page = PageSource::from_json(regions, Some(styles))?;
//! let result = convert_to_docx(&[page], ConvertOptions::default())?;
//! assert_eq!(result.stats().headings, 1);
//! assert_eq!(result.stats().paragraphs, 1);
//! # Ok::<(), redocx::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Style resolution**: per-label defaults merged with sparse overrides
//! - **Floating layout**: side-by-side columns and absolutely placed text boxes
//! - **Tables**: merged cells, cascading cell colors, keyword highlights
//! - **Math**: LaTeX artifacts cleaned from prose, formulas written as OMML
//! - **Parallel processing**: pages built on Rayon, assembled in page order

pub mod build;
pub mod convert;
pub mod error;
pub mod math;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use build::{BuildOptions, PageBuild, PageBuilder, PageSource, StyleTable};
pub use convert::{
    convert_to_docx, BuildReport, ConvertOptions, ConvertResult, Converter, PageSelection,
};
pub use error::{Error, Result};
pub use math::NotationIssue;
pub use model::{Document, Metadata, Node, Page, PageGeometry, Region};
pub use render::{AssemblyStats, DocxAssembler, DocxOutput, JsonFormat, RenderOptions};

use std::path::{Path, PathBuf};

/// Build a single page tree with default options.
///
/// # Example
///
/// ```
/// use redocx::{build_page, PageSource, Region};
///
/// let built = build_page(1, &PageSource::new(vec![Region::text(0, "Hello")]));
/// assert_eq!(built.page.plain_text(), "Hello");
/// ```
pub fn build_page(number: u32, source: &PageSource) -> PageBuild {
    let options = BuildOptions::default();
    PageBuilder::new(&options).build(number, source)
}

/// Load page sources from a whole-document region list.
///
/// `regions` is a JSON list of pages, each a list of regions. `styles`, when
/// given, holds one style list per page; pages past its end get no hints.
pub fn load_pages(regions: &str, styles: Option<&[&str]>) -> Result<Vec<PageSource>> {
    let pages = build::parse_document_regions(regions)?;
    let styles = styles.unwrap_or_default();

    pages
        .into_iter()
        .enumerate()
        .map(|(i, regions)| {
            let table = match styles.get(i) {
                Some(json) => StyleTable::from_json(json)?,
                None => StyleTable::default(),
            };
            Ok(PageSource::new(regions).with_styles(table))
        })
        .collect()
}

/// Serialize a built document as JSON.
pub fn to_json(document: &Document, format: JsonFormat) -> Result<String> {
    render::to_json(document, format)
}

/// Builder for converting OCR pages to DOCX.
///
/// # Example
///
/// ```
/// use redocx::{PageSource, Redocx, Region};
///
/// let pages = vec![
///     PageSource::new(vec![Region::text(0, "First")]),
///     PageSource::new(vec![Region::text(0, "Second")]),
/// ];
/// let result = Redocx::new()
///     .with_title("Scan")
///     .sequential()
///     .convert(&pages)?;
/// assert_eq!(result.stats().pages, 2);
/// # Ok::<(), redocx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Redocx {
    options: ConvertOptions,
}

impl Redocx {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.options = self.options.with_geometry(geometry);
        self
    }

    /// Add a directory to search for image assets.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_asset_dir(dir);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Skip notation validation.
    pub fn without_validation(mut self) -> Self {
        self.options = self.options.with_validation(false);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let metadata = self.options.render.metadata.clone().with_title(title);
        self.options = self.options.with_metadata(metadata);
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let metadata = self.options.render.metadata.clone().with_author(author);
        self.options = self.options.with_metadata(metadata);
        self
    }

    /// Get the accumulated options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build the page tree without assembling.
    pub fn build(self, sources: &[PageSource]) -> Result<BuildReport> {
        Converter::new(self.options).build_document(sources)
    }

    /// Convert to DOCX bytes.
    pub fn convert(self, sources: &[PageSource]) -> Result<ConvertResult> {
        Converter::new(self.options).to_docx(sources)
    }

    /// Convert and write the package to a file.
    pub fn write<P: AsRef<Path>>(self, sources: &[PageSource], path: P) -> Result<ConvertResult> {
        Converter::new(self.options).write_docx(sources, path)
    }
}
