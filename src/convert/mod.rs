//! End-to-end conversion: page sources in, page tree or DOCX out.
//!
//! Pages are independent once their regions and styles are loaded, so they
//! are built on a rayon pool. Finished pages come back over a channel in
//! whatever order they complete, and an [`OrderedMerge`] hands them to the
//! assembler in ascending page order.
//!
//! # Example
//!
//! ```
//! use redocx::convert::{ConvertOptions, Converter};
//! use redocx::build::PageSource;
//! use redocx::model::Region;
//!
//! let pages = vec![PageSource::new(vec![Region::text(0, "First page")])];
//! let converter = Converter::new(ConvertOptions::default().sequential());
//! let report = converter.build_document(&pages)?;
//! assert_eq!(report.document.plain_text(), "First page");
//! # Ok::<(), redocx::Error>(())
//! ```

mod merge;
mod options;

pub use merge::OrderedMerge;
pub use options::{ConvertOptions, PageSelection};

use crate::build::{PageBuild, PageBuilder, PageSource};
use crate::error::Result;
use crate::math::NotationIssue;
use crate::model::{Document, Metadata};
use crate::render::{AssemblyStats, DocxAssembler, DocxOutput};
use rayon::prelude::*;
use std::path::Path;

/// A built page tree and the notation issues found while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// The resolved page tree
    pub document: Document,

    /// Leftover notation in non-formula text, in page order
    pub issues: Vec<NotationIssue>,
}

/// Result of a DOCX conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The finished package
    pub output: DocxOutput,

    /// Leftover notation in non-formula text, in page order
    pub issues: Vec<NotationIssue>,
}

impl ConvertResult {
    /// Package bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.output.bytes
    }

    /// Assembly statistics.
    pub fn stats(&self) -> &AssemblyStats {
        &self.output.stats
    }
}

/// Runs the build and assembly stages over a set of pages.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build the page tree for the selected pages.
    pub fn build_document(&self, sources: &[PageSource]) -> Result<BuildReport> {
        let mut document = Document {
            metadata: self.metadata(),
            pages: Vec::new(),
        };
        let mut issues = Vec::new();

        self.build_pages(sources, |built| {
            issues.extend(built.issues);
            document.add_page(built.page);
            Ok(())
        })?;

        Ok(BuildReport { document, issues })
    }

    /// Build the selected pages and assemble them into a DOCX package.
    pub fn to_docx(&self, sources: &[PageSource]) -> Result<ConvertResult> {
        let mut render = self.options.render.clone();
        render.metadata = self.metadata();
        let mut assembler = DocxAssembler::new(render)?;
        let mut issues = Vec::new();

        self.build_pages(sources, |built| {
            issues.extend(built.issues);
            assembler.push_page(&built.page)
        })?;

        let output = assembler.finish()?;
        log::debug!(
            "Converted {} page(s), {} notation issue(s)",
            output.stats.pages,
            issues.len()
        );
        Ok(ConvertResult { output, issues })
    }

    /// Convert and write the package to a file.
    pub fn write_docx(&self, sources: &[PageSource], path: impl AsRef<Path>) -> Result<ConvertResult> {
        let result = self.to_docx(sources)?;
        result.output.save(path)?;
        Ok(result)
    }

    fn metadata(&self) -> Metadata {
        let metadata = &self.options.render.metadata;
        if *metadata == Metadata::default() {
            Metadata::now()
        } else {
            metadata.clone()
        }
    }

    /// Build every selected page and hand each to `sink` in ascending order.
    fn build_pages<F>(&self, sources: &[PageSource], mut sink: F) -> Result<()>
    where
        F: FnMut(PageBuild) -> Result<()>,
    {
        let numbers = self.options.pages.resolve(sources.len() as u32)?;
        let builder = PageBuilder::new(&self.options.build);
        let source_of = |number: u32| &sources[(number - 1) as usize];

        if !self.options.parallel || numbers.len() < 2 {
            for &number in &numbers {
                sink(builder.build(number, source_of(number)))?;
            }
            return Ok(());
        }

        let (tx, rx) = crossbeam_channel::unbounded::<(usize, PageBuild)>();
        std::thread::scope(|scope| -> Result<()> {
            let numbers = &numbers;
            scope.spawn(move || {
                numbers
                    .par_iter()
                    .enumerate()
                    .for_each_with(tx, |tx, (slot, &number)| {
                        let built = builder.build(number, source_of(number));
                        if tx.send((slot, built)).is_err() {
                            log::debug!("Page {} built after assembly stopped", number);
                        }
                    });
            });

            // Moved in so an early return disconnects the workers.
            let rx = rx;
            let mut merge = OrderedMerge::new();
            for (slot, built) in rx.iter() {
                for page in merge.push(slot, built) {
                    sink(page)?;
                }
            }
            Ok(())
        })
    }
}

/// Convert page sources to DOCX bytes with the given options.
pub fn convert_to_docx(sources: &[PageSource], options: ConvertOptions) -> Result<ConvertResult> {
    Converter::new(options).to_docx(sources)
}
