//! Error types for redocx library.

use std::io;
use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rebuilding or writing a document.
///
/// Problems confined to a single region (bad table markup, a missing image,
/// an unknown style value) are not errors: they degrade in place and are
/// logged. Only caller contract violations and output failures surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Region or style input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing package XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error writing the ZIP package.
    #[error("Package error: {0}")]
    Package(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Pages handed to the assembler out of ascending order.
    #[error("Page {got} received after page {expected_after}; pages must be ascending")]
    PageOrder {
        /// Last page number accepted
        expected_after: u32,
        /// Offending page number
        got: u32,
    },

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (DOCX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}
