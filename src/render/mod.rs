//! Rendering of resolved page trees.
//!
//! DOCX is the primary output. The JSON renderer dumps the same page tree
//! for inspection and for callers that lay out pages themselves.

pub mod docx;
mod json;
mod options;
mod result;

pub use docx::{to_docx, DocxAssembler};
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use result::{AssemblyStats, DocxOutput};
