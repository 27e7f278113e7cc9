//! Locating embedded images within a page region.

use crate::geometry::BBox;

/// A raw page-level image entry, in content-stream order.
///
/// `width`/`height` are the source pixel dimensions from the image XObject
/// dictionary; `srcsize` carries the same pair in one field. Missing
/// dictionary entries pass through as `None` rather than raising an error.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageImage {
    /// Placed bounding box on the page.
    pub bbox: BBox,
    /// Source pixel width.
    pub width: Option<u32>,
    /// Source pixel height.
    pub height: Option<u32>,
    /// XObject resource name (e.g. "Im0").
    pub name: Option<String>,
    /// Source pixel dimensions `(width, height)`.
    pub srcsize: Option<(u32, u32)>,
}

/// An image record filtered into a region report.
///
/// `image_id` is the 0-based position in the page's full image list, so ids
/// in a filtered report may be non-contiguous.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionImage {
    /// 0-based position in the page's original image list.
    pub image_id: usize,
    /// Placed bounding box on the page.
    pub image_bbox: BBox,
    /// Source pixel width.
    pub width: Option<u32>,
    /// Source pixel height.
    pub height: Option<u32>,
    /// XObject resource name.
    pub name: Option<String>,
    /// Source pixel dimensions `(width, height)`.
    pub srcsize: Option<(u32, u32)>,
}

/// Filter the page image list to images overlapping `region`.
///
/// Iterates in original order and keeps each image iff it shares positive
/// area with the region (edge-adjacent images are excluded). Metadata fields
/// are copied through verbatim.
pub fn locate_images(region: &BBox, page_images: &[PageImage]) -> Vec<RegionImage> {
    page_images
        .iter()
        .enumerate()
        .filter(|(_, img)| region.overlaps(&img.bbox))
        .map(|(i, img)| RegionImage {
            image_id: i,
            image_bbox: img.bbox,
            width: img.width,
            height: img.height,
            name: img.name.clone(),
            srcsize: img.srcsize,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_image(x0: f64, top: f64, x1: f64, bottom: f64) -> PageImage {
        PageImage {
            bbox: BBox::new(x0, top, x1, bottom),
            width: Some(400),
            height: Some(300),
            name: Some("Im0".to_string()),
            srcsize: Some((400, 300)),
        }
    }

    #[test]
    fn keeps_only_overlapping_images() {
        let images = vec![make_image(0.0, 0.0, 5.0, 5.0), make_image(50.0, 50.0, 60.0, 60.0)];
        let region = BBox::new(0.0, 0.0, 10.0, 10.0);
        let located = locate_images(&region, &images);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].image_id, 0);
        assert_eq!(located[0].image_bbox, BBox::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn image_id_preserves_original_position() {
        let images = vec![
            make_image(500.0, 500.0, 550.0, 550.0),
            make_image(0.0, 0.0, 5.0, 5.0),
            make_image(600.0, 600.0, 650.0, 650.0),
            make_image(2.0, 2.0, 8.0, 8.0),
        ];
        let region = BBox::new(0.0, 0.0, 10.0, 10.0);
        let located = locate_images(&region, &images);
        let ids: Vec<usize> = located.iter().map(|img| img.image_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn edge_adjacent_image_excluded() {
        let images = vec![make_image(10.0, 0.0, 20.0, 10.0)];
        let region = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(locate_images(&region, &images).is_empty());
    }

    #[test]
    fn nullable_metadata_passes_through() {
        let images = vec![PageImage {
            bbox: BBox::new(0.0, 0.0, 5.0, 5.0),
            width: None,
            height: None,
            name: None,
            srcsize: None,
        }];
        let region = BBox::new(0.0, 0.0, 10.0, 10.0);
        let located = locate_images(&region, &images);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].width, None);
        assert_eq!(located[0].height, None);
        assert_eq!(located[0].name, None);
        assert_eq!(located[0].srcsize, None);
    }

    #[test]
    fn empty_page_image_list() {
        let region = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(locate_images(&region, &[]).is_empty());
    }
}
