//! End-to-end tests: build small PDFs with lopdf, extract a region, and
//! check the report.

use lopdf::{Document, Object, Stream, dictionary};
use pdfregion::{BBox, Pdf, PdfError, extract_region};

/// Serialize a one-page PDF (US Letter) with the given content stream and
/// optionally one named XObject.
fn one_page_pdf(content: &str, xobject: Option<(&str, Stream)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let mut resources = dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    };
    if let Some((name, stream)) = xobject {
        // Streams must be indirect objects
        let xobj_id = doc.add_object(stream);
        resources.set(
            "XObject",
            dictionary! { name => Object::Reference(xobj_id) },
        );
    }

    let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "Contents" => Object::Reference(content_id),
        "Resources" => resources,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn gray_image(width: i64, height: i64) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8; (width * height) as usize],
    )
}

#[test]
fn text_lines_are_reconstructed_in_reading_order() {
    // Two words on one baseline, one word on the next line down.
    let content = "BT /F1 12 Tf 72 700 Td (Hello) Tj ET \
                   BT /F1 12 Tf 110 700 Td (World) Tj ET \
                   BT /F1 12 Tf 72 660 Td (Next) Tj ET";
    let pdf = Pdf::open(&one_page_pdf(content, None)).unwrap();

    let report = extract_region(&pdf, 0, BBox::new(50.0, 50.0, 300.0, 200.0)).unwrap();

    assert_eq!(report.text_line_count, 2);
    assert_eq!(report.text[0].text, "Hello World");
    assert_eq!(report.text[1].text, "Next");
    assert!(report.text[0].top < report.text[1].top);
    assert_eq!(report.text[0].fontname, "Helvetica");
    assert!((report.text[0].size - 12.0).abs() < 1e-9);
}

#[test]
fn empty_region_yields_empty_report() {
    let content = "BT /F1 12 Tf 72 700 Td (Hello) Tj ET";
    let pdf = Pdf::open(&one_page_pdf(content, None)).unwrap();

    // Bottom-right corner of the page, far away from the text.
    let report = extract_region(&pdf, 0, BBox::new(400.0, 600.0, 600.0, 780.0)).unwrap();

    assert!(report.text.is_empty());
    assert_eq!(report.text_line_count, 0);
    assert!(report.images.is_empty());
    assert_eq!(report.image_count, 0);
    assert_eq!(report.table_signal.lines_count, 0);
    assert_eq!(report.table_signal.rects_count, 0);
    assert!(!report.table_signal.likely_table);
}

#[test]
fn bbox_is_clamped_and_normalized_once() {
    let pdf = Pdf::open(&one_page_pdf("", None)).unwrap();

    let report = extract_region(&pdf, 0, BBox::new(-50.0, -10.0, 10_000.0, 10_000.0)).unwrap();
    assert_eq!(report.bbox, BBox::new(0.0, 0.0, 612.0, 792.0));

    // Inverted corners are swapped after clamping.
    let report = extract_region(&pdf, 0, BBox::new(300.0, 200.0, 100.0, 50.0)).unwrap();
    assert_eq!(report.bbox, BBox::new(100.0, 50.0, 300.0, 200.0));
}

#[test]
fn dense_ruling_trips_the_table_signal() {
    // A 4x4 grid of filled cells: 16 rects, over the threshold of 15.
    let mut content = String::new();
    for row in 0..4 {
        for col in 0..4 {
            let x = 100 + col * 60;
            let y = 500 + row * 30;
            content.push_str(&format!("{x} {y} 50 20 re f "));
        }
    }
    let pdf = Pdf::open(&one_page_pdf(&content, None)).unwrap();

    let report = extract_region(&pdf, 0, BBox::new(50.0, 100.0, 450.0, 350.0)).unwrap();
    assert_eq!(report.table_signal.rects_count, 16);
    assert!(report.table_signal.likely_table);
}

#[test]
fn fifteen_edges_is_not_a_table() {
    let mut content = String::new();
    for i in 0..15 {
        let y = 500 + i * 10;
        content.push_str(&format!("100 {y} 50 5 re f "));
    }
    let pdf = Pdf::open(&one_page_pdf(&content, None)).unwrap();

    let report = extract_region(&pdf, 0, BBox::new(0.0, 0.0, 612.0, 792.0)).unwrap();
    assert_eq!(report.table_signal.rects_count, 15);
    assert!(!report.table_signal.likely_table);
}

#[test]
fn overlapping_image_is_reported_with_page_order_id() {
    // 100x50 pt placement at (20, 600) in PDF coords -> top 142 on the page.
    let content = "q 100 0 0 50 20 600 cm /Im1 Do Q";
    let pdf = Pdf::open(&one_page_pdf(content, Some(("Im1", gray_image(40, 20))))).unwrap();

    let report = extract_region(&pdf, 0, BBox::new(0.0, 100.0, 300.0, 300.0)).unwrap();
    assert_eq!(report.image_count, 1);
    let image = &report.images[0];
    assert_eq!(image.image_id, 0);
    assert_eq!(image.width, Some(40));
    assert_eq!(image.height, Some(20));
    assert_eq!(image.srcsize, Some((40, 20)));
    assert!((image.image_bbox.top - 142.0).abs() < 1e-9);

    // A region that misses the image entirely.
    let report = extract_region(&pdf, 0, BBox::new(0.0, 300.0, 300.0, 500.0)).unwrap();
    assert!(report.images.is_empty());
}

#[test]
fn page_out_of_range_is_an_error() {
    let pdf = Pdf::open(&one_page_pdf("", None)).unwrap();
    let err = extract_region(&pdf, 3, BBox::new(0.0, 0.0, 100.0, 100.0)).unwrap_err();
    assert_eq!(
        err,
        PdfError::PageOutOfRange {
            page: 3,
            page_count: 1
        }
    );
}

#[test]
fn report_page_number_and_path_round_trip() {
    let pdf = Pdf::open(&one_page_pdf("", None)).unwrap();
    let report = extract_region(&pdf, 0, BBox::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert_eq!(report.page_number, 0);
    // Opened from memory, so there is no path to report.
    assert_eq!(report.pdf_path, "");
}

#[cfg(feature = "serde")]
#[test]
fn report_serializes_with_bbox_as_array() {
    let content = "BT /F1 12 Tf 72 700 Td (Hi) Tj ET";
    let pdf = Pdf::open(&one_page_pdf(content, None)).unwrap();
    let report = extract_region(&pdf, 0, BBox::new(0.0, 0.0, 612.0, 792.0)).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["bbox"], serde_json::json!([0.0, 0.0, 612.0, 792.0]));
    assert_eq!(value["page_number"], 0);
    assert_eq!(value["text_line_count"], 1);
    assert!(value["table_signal"]["likely_table"].is_boolean());
}
