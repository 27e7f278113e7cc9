use std::path::Path;

use pdfregion::{BBox, Pdf, extract_region};

pub fn run(pdf_path: &Path, page: usize, bbox: &[f64], out: Option<&Path>) -> Result<(), i32> {
    // clap enforces exactly four values; the slice pattern keeps the
    // indexing honest.
    let [x0, top, x1, bottom] = bbox else {
        eprintln!("Error: --bbox expects exactly four values: x0 top x1 bottom");
        return Err(2);
    };

    let pdf = Pdf::open_file(pdf_path).map_err(|e| {
        eprintln!("Error opening {}: {e}", pdf_path.display());
        1
    })?;

    let report = extract_region(&pdf, page, BBox::new(*x0, *top, *x1, *bottom)).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    if report.text.is_empty() {
        eprintln!("No text found inside bbox");
    }

    let json = serde_json::to_string_pretty(&report).map_err(|e| {
        eprintln!("Error serializing report: {e}");
        1
    })?;

    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|e| {
                eprintln!("Error writing {}: {e}", path.display());
                1
            })?;
            println!("Saved output to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
