//! Conversion options and page selection.

use crate::build::BuildOptions;
use crate::error::{Error, Result};
use crate::model::{Metadata, PageGeometry};
use crate::render::RenderOptions;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Options for a whole conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Page tree building options
    pub build: BuildOptions,

    /// DOCX assembly options
    pub render: RenderOptions,

    /// Pages to convert
    pub pages: PageSelection,

    /// Build pages on a worker pool
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry for the whole document.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.build.geometry = geometry;
        self
    }

    /// Add a directory to search for image assets.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render = self.render.with_asset_dir(dir);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable notation validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.build = self.build.with_validation(validate);
        self
    }

    /// Set package metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.render = self.render.with_metadata(metadata);
        self
    }

    /// Replace the build options.
    pub fn with_build_options(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            render: RenderOptions::default(),
            pages: PageSelection::All,
            parallel: true,
        }
    }
}

/// Page selection for conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Convert all pages
    #[default]
    All,
    /// Convert a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Convert specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Resolve against a page count into ascending page numbers.
    ///
    /// Any selected page of 0 or past `count` is a caller error.
    pub fn resolve(&self, count: u32) -> Result<Vec<u32>> {
        match self {
            PageSelection::All => Ok((1..=count).collect()),
            PageSelection::Range(range) => {
                if range.is_empty() {
                    return Err(Error::InvalidPageRange(format!(
                        "{}-{}",
                        range.start(),
                        range.end()
                    )));
                }
                check_page(*range.start(), count)?;
                check_page(*range.end(), count)?;
                Ok(range.clone().collect())
            }
            PageSelection::Pages(pages) => {
                let mut pages = pages.clone();
                pages.sort_unstable();
                pages.dedup();
                for &page in &pages {
                    check_page(page, count)?;
                }
                Ok(pages)
            }
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_number(start, s)?;
                let end = parse_number(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_number(start, s)?;
                let end = parse_number(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_number(part, s)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_number(part: &str, whole: &str) -> Result<u32> {
    part.trim()
        .parse()
        .map_err(|_| Error::InvalidPageRange(whole.to_string()))
}

fn check_page(page: u32, count: u32) -> Result<()> {
    if page == 0 || page > count {
        return Err(Error::PageOutOfRange(page, count));
    }
    Ok(())
}
