//! pdfregion-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (BBox, Char, Word, TextLine,
//! PageImage, TableSignal, RegionReport) and the region-analysis algorithms
//! (bbox normalization, overlap testing, line reconstruction, image location,
//! table-signal estimation) used by pdfregion. It has no PDF-parsing
//! dependencies — all functionality is pure Rust.

pub mod error;
pub mod geometry;
pub mod images;
pub mod lines;
pub mod report;
pub mod signal;
pub mod words;

pub use error::PdfError;
pub use geometry::{BBox, Ctm, Point};
pub use images::{PageImage, RegionImage, locate_images};
pub use lines::{TextLine, reconstruct_lines};
pub use report::RegionReport;
pub use signal::{TABLE_EDGE_THRESHOLD, TableSignal, VectorCounts, estimate_table_signal};
pub use words::{Char, Word, WordExtractor, WordOptions};
