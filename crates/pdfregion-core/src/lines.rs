//! Reconstruction of visual text lines from word records.
//!
//! Words are clustered into lines by their `top` coordinate rounded to the
//! nearest integer. This is a band heuristic, not baseline detection: words
//! landing in the same one-unit band share a line, regardless of font
//! metrics.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::geometry::BBox;
use crate::words::Word;

/// A reconstructed visual text line.
///
/// Built once by [`reconstruct_lines`] and never mutated afterwards. The
/// coordinates are the bounding envelope of the whole line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Word texts joined with a single space.
    pub text: String,
    /// Most frequent font name among the line's words.
    pub fontname: String,
    /// Most frequent font size among the line's words.
    pub size: f64,
    /// Left edge (min over words).
    pub x0: f64,
    /// Top edge (min over words).
    pub top: f64,
    /// Right edge (max over words).
    pub x1: f64,
    /// Bottom edge (max over words).
    pub bottom: f64,
}

impl TextLine {
    /// Returns the bounding box of this line.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }
}

/// The most frequent key, breaking ties by first encounter order.
///
/// Naive frequency counting leaves tie order implementation-defined; tracking
/// the first-seen index makes the tie-break stable and reproducible.
fn most_common_first_seen<K: Eq + Hash + Clone>(keys: impl Iterator<Item = K>) -> Option<K> {
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (idx, key) in keys.enumerate() {
        let entry = counts.entry(key).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .min_by(|(_, (ca, ia)), (_, (cb, ib))| cb.cmp(ca).then(ia.cmp(ib)))
        .map(|(key, _)| key)
}

/// Group words into visual lines and aggregate per-line attributes.
///
/// - The line-grouping key is `top` rounded to the nearest integer.
/// - Words within a group are ordered left-to-right by `x0` and their texts
///   joined with a single space (original inter-word spacing width is not
///   reconstructed).
/// - `fontname` and `size` are the most frequent value among the group's
///   words, first-seen value winning ties.
/// - Line coordinates are the bounding envelope of the group.
/// - Lines are returned ordered by their aggregated `top` (top of page
///   first), not by the grouping key.
///
/// An empty input yields an empty output; there are no failure modes.
pub fn reconstruct_lines(words: &[Word]) -> Vec<TextLine> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
    for word in words {
        groups
            .entry(word.bbox.top.round() as i64)
            .or_default()
            .push(word);
    }

    let mut lines: Vec<TextLine> = Vec::with_capacity(groups.len());
    for group in groups.into_values() {
        lines.push(aggregate_line(group));
    }

    lines.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    lines
}

fn aggregate_line(mut group: Vec<&Word>) -> TextLine {
    group.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let text = group
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let fontname = most_common_first_seen(group.iter().map(|w| w.fontname.clone()))
        .unwrap_or_default();
    // f64 is not hashable; counting runs over the bit pattern.
    let size = most_common_first_seen(group.iter().map(|w| w.size.to_bits()))
        .map(f64::from_bits)
        .unwrap_or_default();

    let mut bbox = group[0].bbox;
    for word in &group[1..] {
        bbox = bbox.union(&word.bbox);
    }

    TextLine {
        text,
        fontname,
        size,
        x0: bbox.x0,
        top: bbox.top,
        x1: bbox.x1,
        bottom: bbox.bottom,
    }
}
