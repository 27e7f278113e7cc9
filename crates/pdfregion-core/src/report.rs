//! The terminal region-report aggregate.

use crate::geometry::BBox;
use crate::images::RegionImage;
use crate::lines::TextLine;
use crate::signal::TableSignal;

/// Structured metadata for one `(document, page, bbox)` request.
///
/// `text_line_count` and `image_count` are derived from the sequences at
/// construction time and always equal their lengths; the struct offers no way
/// to set them independently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionReport {
    /// Path of the source document, as supplied by the caller.
    pub pdf_path: String,
    /// 0-based page index.
    pub page_number: usize,
    /// The normalized region rectangle (never the caller's raw input).
    pub bbox: BBox,
    /// Reconstructed text lines, ordered top-to-bottom.
    pub text: Vec<TextLine>,
    /// Length of `text`.
    pub text_line_count: usize,
    /// Images overlapping the region, in original page order.
    pub images: Vec<RegionImage>,
    /// Length of `images`.
    pub image_count: usize,
    /// Vector-density table signal for the region.
    pub table_signal: TableSignal,
}

impl RegionReport {
    /// Assemble a report from the three analysis outputs.
    pub fn new(
        pdf_path: String,
        page_number: usize,
        bbox: BBox,
        text: Vec<TextLine>,
        images: Vec<RegionImage>,
        table_signal: TableSignal,
    ) -> Self {
        let text_line_count = text.len();
        let image_count = images.len();
        Self {
            pdf_path,
            page_number,
            bbox,
            text,
            text_line_count,
            images,
            image_count,
            table_signal,
        }
    }
}
