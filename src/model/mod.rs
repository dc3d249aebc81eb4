//! Document model types.
//!
//! Regions and style hints come in from the OCR and style services; the
//! resolved page tree (pages of [`Node`]s) goes out to the renderers. The
//! tree is format-agnostic: the DOCX assembler and the JSON renderer both
//! read the same structures.

mod asset;
mod document;
mod page;
mod paragraph;
mod region;
mod style;
mod table;

pub use asset::{AssetRef, MediaType};
pub use document::{Document, Metadata};
pub use page::{ImageNode, Margins, Node, Page, PageGeometry, SideBySideGroup, TextFrame};
pub use paragraph::{Alignment, Heading, Paragraph, ParagraphRole, ParagraphStyle, Run, RunStyle};
pub use region::{BBox, NativeLabel, Region, StructuralLabel, NORMALIZED_EXTENT};
pub use style::{
    BorderStyle, CellOverrides, ColorOverride, EffectiveStyle, FontFamily, KeywordStyle,
    OverrideKind, Rgb, StyleOverride,
};
pub use table::{Cell, ColumnWidths, TableGrid, WIDTH_UNITS};
