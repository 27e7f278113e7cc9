//! pdfregion-parse: lopdf-backed PDF reading and content stream interpretation.
//!
//! This crate turns a PDF page into the flat collections the region analyses
//! consume: positioned characters, classified vector primitives (lines,
//! rects, curves), and placed images. It depends on pdfregion-core for the
//! shared data types.

pub mod error;
mod font;
mod interpreter;
pub mod lopdf_backend;

pub use error::BackendError;
pub use interpreter::PageContent;
pub use lopdf_backend::{LoadedDocument, ParsedPage};
