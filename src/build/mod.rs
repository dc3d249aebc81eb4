//! Page tree building.
//!
//! Turns one page of OCR regions plus style hints into a [`Page`] of
//! resolved nodes. Style resolution and floating detection run first; the
//! page builder then calls the table reconstructor, the run splitter, and
//! the math cleaner for each node.
//!
//! ```
//! use redocx::build::{BuildOptions, PageBuilder, PageSource};
//! use redocx::model::Region;
//!
//! let source = PageSource::new(vec![Region::text(0, "Hello **world**")]);
//! let options = BuildOptions::default();
//! let built = PageBuilder::new(&options).build(1, &source);
//! assert_eq!(built.page.plain_text(), "Hello world");
//! ```
//!
//! [`Page`]: crate::model::Page

pub mod floating;
mod options;
mod page;
pub mod runs;
pub mod style;
pub mod table;

pub use floating::{FloatingConfig, FloatingLayout};
pub use options::BuildOptions;
pub use page::{parse_document_regions, parse_regions, PageBuild, PageBuilder, PageSource};
pub use runs::split_runs;
pub use style::{default_style, resolve_style, StyleTable};
pub use table::{first_specified, parse_table_markup, reconstruct_table};
