//! pdfregion: structured metadata for a rectangular region of a PDF page.
//!
//! Given a document, a 0-based page index, and a bounding box in top-left
//! page coordinates, this crate reconstructs the region's text lines, locates
//! overlapping images, and reports a vector-density table signal.
//!
//! # Architecture
//!
//! - **pdfregion-core**: backend-independent data types and analyses
//! - **pdfregion-parse**: lopdf-based PDF reading and content stream
//!   interpretation
//! - **pdfregion** (this crate): public API tying the two together
//!
//! # Example
//!
//! ```ignore
//! let pdf = Pdf::open_file("report.pdf")?;
//! let report = extract_region(&pdf, 0, BBox::new(50.0, 100.0, 550.0, 400.0))?;
//! println!("{} lines, likely_table={}", report.text_line_count, report.table_signal.likely_table);
//! ```

mod page;
mod pdf;
mod region;

pub use page::Page;
pub use pdf::Pdf;
pub use region::extract_region;

// Core types callers need to build requests and consume reports.
pub use pdfregion_core::{
    BBox, Char, PageImage, PdfError, RegionImage, RegionReport, TABLE_EDGE_THRESHOLD, TableSignal,
    TextLine, VectorCounts, Word, WordOptions,
};
