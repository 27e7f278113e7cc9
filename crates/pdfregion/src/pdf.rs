//! Top-level PDF document type for opening and extracting content.

use std::path::{Path, PathBuf};

use pdfregion_core::PdfError;
use pdfregion_parse::LoadedDocument;

use crate::Page;

/// A PDF document opened for region extraction.
///
/// Wraps a parsed PDF and hands out [`Page`] values on demand. The document
/// is parsed once at open time; each [`page()`](Pdf::page) call interprets
/// that page's content streams.
#[derive(Debug)]
pub struct Pdf {
    doc: LoadedDocument,
    /// Where the document came from, when opened from a file. Reported back
    /// verbatim in region reports.
    path: Option<PathBuf>,
}

impl Pdf {
    /// Parse a PDF from memory.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LoadedDocument::open(bytes).map_err(PdfError::from)?;
        Ok(Self { doc, path: None })
    }

    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let doc = LoadedDocument::open_file(path.as_ref()).map_err(PdfError::from)?;
        Ok(Self {
            doc,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Path the document was opened from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Interpret and return the page at `index` (0-based).
    ///
    /// Fails with [`PdfError::PageOutOfRange`] when `index` is past the last
    /// page.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let parsed = self.doc.parse_page(index).map_err(PdfError::from)?;
        Ok(Page::from_parsed(index, parsed))
    }
}
