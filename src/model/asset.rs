//! Image asset references and media types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an externally cropped image file.
///
/// Assets are addressed by 0-based page index and a per-page counter; the
/// cropping service writes them before the document is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    /// 0-based page index
    pub page_index: u32,

    /// Per-page sequential counter
    pub counter: u32,
}

impl AssetRef {
    /// Create a reference.
    pub fn new(page_index: u32, counter: u32) -> Self {
        Self {
            page_index,
            counter,
        }
    }

    /// Path relative to an asset directory.
    pub fn relative_path(&self) -> String {
        format!(
            "imgs/cropped_page{}_idx{}.jpg",
            self.page_index, self.counter
        )
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Image format of an embedded media part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// JPEG
    Jpeg,
    /// PNG
    Png,
    /// GIF
    Gif,
    /// BMP
    Bmp,
    /// TIFF
    Tiff,
}

impl MediaType {
    /// Detect the format from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(MediaType::Jpeg);
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(MediaType::Png);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(MediaType::Gif);
        }

        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(MediaType::Tiff);
        }

        if data.starts_with(b"BM") {
            return Some(MediaType::Bmp);
        }

        None
    }

    /// File extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpeg",
            MediaType::Png => "png",
            MediaType::Gif => "gif",
            MediaType::Bmp => "bmp",
            MediaType::Tiff => "tiff",
        }
    }

    /// MIME type for `[Content_Types].xml`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::Bmp => "image/bmp",
            MediaType::Tiff => "image/tiff",
        }
    }

    /// All known formats.
    pub fn all() -> [MediaType; 5] {
        [
            MediaType::Jpeg,
            MediaType::Png,
            MediaType::Gif,
            MediaType::Bmp,
            MediaType::Tiff,
        ]
    }
}
