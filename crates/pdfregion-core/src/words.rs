//! Grouping of positioned characters into word records.

use crate::geometry::BBox;

/// A single positioned character produced by the content-stream interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    /// The character's text (usually one code point).
    pub text: String,
    /// Bounding box on the page.
    pub bbox: BBox,
    /// Font resource or base-font name.
    pub fontname: String,
    /// Effective font size in points.
    pub size: f64,
}

/// Options for word extraction.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Maximum horizontal gap between characters to group into a word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between characters to group into a word.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A word extracted from a page: one contiguous run of non-blank characters.
///
/// Carries a single `(fontname, size)` pair; extraction starts a new word
/// when either attribute changes between adjacent characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
    /// Font name shared by the constituent characters.
    pub fontname: String,
    /// Font size shared by the constituent characters.
    pub size: f64,
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from the given characters.
    ///
    /// Characters are sorted top-to-bottom then left-to-right, and grouped
    /// into words. A word ends at a whitespace character, at a horizontal
    /// gap larger than `x_tolerance`, at a vertical offset larger than
    /// `y_tolerance`, or when the font name or size changes.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        if chars.is_empty() {
            return Vec::new();
        }

        let mut sorted: Vec<&Char> = chars.iter().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .top
                .partial_cmp(&b.bbox.top)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for ch in sorted {
            let is_blank = ch.text.chars().all(|c| c.is_whitespace());
            if is_blank {
                if !current.is_empty() {
                    words.push(Self::make_word(&current));
                    current.clear();
                }
                continue;
            }

            if let Some(&last) = current.last() {
                if Self::should_split(last, ch, options) {
                    words.push(Self::make_word(&current));
                    current.clear();
                }
            }
            current.push(ch);
        }

        if !current.is_empty() {
            words.push(Self::make_word(&current));
        }

        words
    }

    /// Check whether two adjacent chars belong to different words.
    ///
    /// Gap is the geometric distance between x-intervals: zero for
    /// overlapping or touching chars, positive for separated chars.
    fn should_split(last: &Char, current: &Char, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        x_gap > options.x_tolerance
            || y_diff > options.y_tolerance
            || last.fontname != current.fontname
            || last.size != current.size
    }

    fn make_word(chars: &[&Char]) -> Word {
        let mut bbox = chars[0].bbox;
        let mut text = String::new();
        for ch in chars {
            bbox = bbox.union(&ch.bbox);
            text.push_str(&ch.text);
        }
        Word {
            text,
            bbox,
            fontname: chars[0].fontname.clone(),
            size: chars[0].size,
        }
    }
}
