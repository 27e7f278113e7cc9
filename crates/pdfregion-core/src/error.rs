//! Error types for pdfregion.
//!
//! Provides [`PdfError`] for fatal errors that abort a region request.
//! There is deliberately no error for malformed bounding boxes (any four
//! numbers normalize to a valid rectangle) and none for empty regions (a
//! region without text is a valid report with an empty line list).

use std::fmt;

/// Fatal error types for region extraction.
///
/// Collaborator-level failures propagate unmodified to the caller; a request
/// either produces a complete [`RegionReport`](crate::RegionReport) or fails
/// as a whole. There is no partial-report mode.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// Requested page index is out of range for the document.
    PageOutOfRange {
        /// The requested 0-based page index.
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PageOutOfRange { page, page_count } => {
                write!(f, "page index {page} out of range (document has {page_count} pages)")
            }
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}
