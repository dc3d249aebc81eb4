//! Rendering options and configuration.

use crate::model::Metadata;
use std::path::PathBuf;

/// Options for assembling a DOCX package.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directories searched, in order, for cropped image assets
    pub asset_dirs: Vec<PathBuf>,

    /// Horizontal margin budget in points subtracted from the page width
    /// to get the usable image width
    pub margin_budget_pt: f32,

    /// Text used in place of a missing image, as `[{prefix}: {reference}]`
    pub placeholder_prefix: String,

    /// Package metadata written to `docProps/core.xml`
    pub metadata: Metadata,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory to search for image assets.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dirs.push(dir.into());
        self
    }

    /// Set the usable-width margin budget.
    pub fn with_margin_budget(mut self, points: f32) -> Self {
        self.margin_budget_pt = points.max(0.0);
        self
    }

    /// Set the missing-image placeholder prefix.
    pub fn with_placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    /// Set package metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// First existing file for a relative asset path.
    pub fn locate_asset(&self, relative: &str) -> Option<PathBuf> {
        self.asset_dirs
            .iter()
            .map(|dir| dir.join(relative))
            .find(|path| path.is_file())
    }

    /// Placeholder text for a missing asset.
    pub fn placeholder(&self, reference: impl std::fmt::Display) -> String {
        format!("[{}: {}]", self.placeholder_prefix, reference)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            asset_dirs: Vec::new(),
            margin_budget_pt: 72.0,
            placeholder_prefix: "Image missing".to_string(),
            metadata: Metadata::default(),
        }
    }
}
