use std::path::PathBuf;

use clap::Parser;

/// Extract metadata from a rectangular region of a PDF page.
///
/// Prints a JSON report with the region's reconstructed text lines, the
/// images it overlaps, and a vector-density table signal.
#[derive(Debug, Parser)]
#[command(name = "pdfregion", about, version)]
pub struct Cli {
    /// Path to the PDF file
    #[arg(long, value_name = "FILE")]
    pub pdf: PathBuf,

    /// Page index (0-based)
    #[arg(long, value_name = "INDEX")]
    pub page: usize,

    /// Region coordinates in top-left page points
    #[arg(
        long,
        required = true,
        num_args = 4,
        value_names = ["X0", "TOP", "X1", "BOTTOM"],
        allow_negative_numbers = true
    )]
    pub bbox: Vec<f64>,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}
