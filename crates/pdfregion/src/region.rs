//! The region extraction pipeline.

use pdfregion_core::{
    BBox, PdfError, RegionReport, TableSignal, WordOptions, reconstruct_lines,
};

use crate::Pdf;

/// Extract structured metadata for a rectangular region of a page.
///
/// `bbox` is given in top-left page coordinates. It is normalized exactly
/// once — clamped to the page rectangle, with inverted corners swapped —
/// and every analysis plus the returned report use that normalized region.
///
/// A region with no content is not an error: the report comes back with
/// empty collections, zero counts, and a negative table signal.
pub fn extract_region(
    pdf: &Pdf,
    page_index: usize,
    bbox: BBox,
) -> Result<RegionReport, PdfError> {
    let page = pdf.page(page_index)?;
    let region = bbox.clamp_to_page(page.width(), page.height());

    let words = page.crop_words(&region, &WordOptions::default());
    let text = reconstruct_lines(&words);

    let images = page.crop_images(&region);

    let counts = page.crop_vector_counts(&region);
    let table_signal = TableSignal::estimate(counts);

    let pdf_path = pdf
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    Ok(RegionReport::new(
        pdf_path,
        page_index,
        region,
        text,
        images,
        table_signal,
    ))
}
