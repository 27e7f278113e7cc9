//! Page type for accessing extracted content from a PDF page.

use pdfregion_core::{
    BBox, Char, PageImage, RegionImage, VectorCounts, Word, WordExtractor, WordOptions,
    locate_images,
};
use pdfregion_parse::ParsedPage;

/// A single page from a PDF document.
///
/// Holds the flat collections produced by content stream interpretation and
/// offers region-cropped views of them. All coordinates are top-left-origin
/// page points.
pub struct Page {
    /// Page index (0-based).
    page_number: usize,
    /// Page width in points.
    width: f64,
    /// Page height in points.
    height: f64,
    chars: Vec<Char>,
    lines: Vec<BBox>,
    rects: Vec<BBox>,
    curves: Vec<BBox>,
    images: Vec<PageImage>,
}

impl Page {
    pub(crate) fn from_parsed(page_number: usize, parsed: ParsedPage) -> Self {
        Self {
            page_number,
            width: parsed.width,
            height: parsed.height,
            chars: parsed.content.chars,
            lines: parsed.content.lines,
            rects: parsed.content.rects,
            curves: parsed.content.curves,
            images: parsed.content.images,
        }
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Returns the page width in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the page height in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the characters extracted from this page.
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Returns the images placed on this page, in content-stream order.
    pub fn images(&self) -> &[PageImage] {
        &self.images
    }

    /// Group the characters whose boxes overlap `region` into words.
    ///
    /// A character counts only when it overlaps the region with positive
    /// area; touching an edge is not enough.
    pub fn crop_words(&self, region: &BBox, options: &WordOptions) -> Vec<Word> {
        let cropped: Vec<Char> = self
            .chars
            .iter()
            .filter(|c| region.overlaps(&c.bbox))
            .cloned()
            .collect();
        WordExtractor::extract(&cropped, options)
    }

    /// Images overlapping `region`, with their page-order ids preserved.
    pub fn crop_images(&self, region: &BBox) -> Vec<RegionImage> {
        locate_images(region, &self.images)
    }

    /// Count the vector primitives intersecting `region`.
    ///
    /// Intersection here is inclusive of shared edges, so hairline rules
    /// with zero-area boxes still count.
    pub fn crop_vector_counts(&self, region: &BBox) -> VectorCounts {
        let count = |boxes: &[BBox]| boxes.iter().filter(|b| region.intersects(b)).count();
        VectorCounts {
            lines: count(&self.lines),
            rects: count(&self.rects),
            curves: count(&self.curves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfregion_parse::PageContent;

    fn make_char(text: &str, x0: f64, top: f64, w: f64, h: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x0 + w, top + h),
            fontname: "Helvetica".to_string(),
            size: h,
        }
    }

    fn page_with(content: PageContent) -> Page {
        Page::from_parsed(
            0,
            ParsedPage {
                width: 612.0,
                height: 792.0,
                content,
            },
        )
    }

    #[test]
    fn crop_words_excludes_chars_outside_region() {
        let content = PageContent {
            chars: vec![
                make_char("A", 10.0, 100.0, 6.0, 12.0),
                make_char("B", 500.0, 100.0, 6.0, 12.0),
            ],
            ..Default::default()
        };
        let page = page_with(content);

        let region = BBox::new(0.0, 90.0, 100.0, 130.0);
        let words = page.crop_words(&region, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "A");
    }

    #[test]
    fn crop_words_excludes_edge_touching_chars() {
        let content = PageContent {
            chars: vec![make_char("A", 100.0, 100.0, 6.0, 12.0)],
            ..Default::default()
        };
        let page = page_with(content);

        // Region's right edge sits exactly on the char's left edge.
        let region = BBox::new(0.0, 0.0, 100.0, 200.0);
        assert!(page.crop_words(&region, &WordOptions::default()).is_empty());
    }

    #[test]
    fn vector_counts_include_edge_touching_hairlines() {
        let content = PageContent {
            lines: vec![BBox::new(0.0, 100.0, 612.0, 100.0)], // zero height
            ..Default::default()
        };
        let page = page_with(content);

        let region = BBox::new(0.0, 100.0, 300.0, 200.0);
        let counts = page.crop_vector_counts(&region);
        assert_eq!(counts.lines, 1);
    }

    #[test]
    fn vector_counts_split_by_kind() {
        let content = PageContent {
            lines: vec![BBox::new(10.0, 10.0, 90.0, 10.0)],
            rects: vec![
                BBox::new(10.0, 20.0, 90.0, 40.0),
                BBox::new(10.0, 50.0, 90.0, 70.0),
            ],
            curves: vec![BBox::new(10.0, 80.0, 90.0, 95.0)],
            ..Default::default()
        };
        let page = page_with(content);

        let counts = page.crop_vector_counts(&BBox::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(counts.lines, 1);
        assert_eq!(counts.rects, 2);
        assert_eq!(counts.curves, 1);
    }
}
