//! Page building options.

use super::floating::FloatingConfig;
use crate::model::PageGeometry;

/// Options for building page trees.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Page geometry stamped on every built page
    pub geometry: PageGeometry,

    /// Record leftover notation in non-formula text
    pub validate_notation: bool,

    /// Floating layout thresholds
    pub floating: FloatingConfig,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Enable or disable notation validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_notation = validate;
        self
    }

    /// Set floating layout thresholds.
    pub fn with_floating(mut self, floating: FloatingConfig) -> Self {
        self.floating = floating;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            validate_notation: true,
            floating: FloatingConfig::default(),
        }
    }
}
