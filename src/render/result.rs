//! Assembly result with statistics.

use serde::{Deserialize, Serialize};

/// A finished DOCX package.
#[derive(Debug, Clone)]
pub struct DocxOutput {
    /// ZIP package bytes
    pub bytes: Vec<u8>,

    /// What went into the package
    pub stats: AssemblyStats,
}

impl DocxOutput {
    /// Package size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the package is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the package to a file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Counts collected while assembling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Pages written
    pub pages: u32,

    /// Heading paragraphs
    pub headings: u32,

    /// Body, caption, footnote and formula paragraphs in flow
    pub paragraphs: u32,

    /// Reconstructed tables
    pub tables: u32,

    /// Embedded images
    pub images: u32,

    /// Images replaced by a placeholder
    pub missing_images: u32,

    /// Absolutely positioned text frames
    pub text_frames: u32,

    /// Side-by-side column groups
    pub side_by_side: u32,

    /// Paragraphs written as Office Math
    pub equations: u32,
}

impl AssemblyStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes rendered.
    pub fn node_count(&self) -> u32 {
        self.headings
            + self.paragraphs
            + self.tables
            + self.images
            + self.missing_images
            + self.text_frames
            + self.side_by_side
    }

    /// Merge statistics from another instance.
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.pages += other.pages;
        self.headings += other.headings;
        self.paragraphs += other.paragraphs;
        self.tables += other.tables;
        self.images += other.images;
        self.missing_images += other.missing_images;
        self.text_frames += other.text_frames;
        self.side_by_side += other.side_by_side;
        self.equations += other.equations;
    }
}
