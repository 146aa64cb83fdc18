//! PDF text layer (spec §4.A): open a document and expose per-page plain
//! text and detected tables.

pub mod document;
pub mod error;
pub mod table_clustering;
pub mod table_edges;
pub mod table_finder;
pub mod table_geometry;
pub mod text_table;

pub use document::{open, Document, PageContent};
pub use table_finder::{DetectedTable, TableSettings, TableStrategy};
