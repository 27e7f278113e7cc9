//! Table-likelihood heuristic from vector-primitive density.

/// Default edge-count threshold above which a region is flagged as a likely
/// table. Strict comparison: `lines + rects` must exceed this value.
pub const TABLE_EDGE_THRESHOLD: usize = 15;

/// Counts of vector path primitives intersecting a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorCounts {
    pub lines: usize,
    pub rects: usize,
    pub curves: usize,
}

/// Heuristic table signal for a page region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSignal {
    /// Straight line primitives intersecting the region.
    pub lines_count: usize,
    /// Rectangle primitives intersecting the region.
    pub rects_count: usize,
    /// Curve (Bézier) primitives intersecting the region.
    pub curves_count: usize,
    /// True iff `lines_count + rects_count` exceeds the threshold.
    pub likely_table: bool,
}

impl TableSignal {
    /// Estimate the table signal with the default threshold.
    pub fn estimate(counts: VectorCounts) -> TableSignal {
        estimate_table_signal(counts, TABLE_EDGE_THRESHOLD)
    }
}

/// Estimate whether a region likely contains a table or grid.
///
/// Curves are reported but excluded from the decision: Bézier paths usually
/// indicate logos or diagrams, not tabular ruling.
pub fn estimate_table_signal(counts: VectorCounts, threshold: usize) -> TableSignal {
    TableSignal {
        lines_count: counts.lines,
        rects_count: counts.rects,
        curves_count: counts.curves,
        likely_table: counts.lines + counts.rects > threshold,
    }
}
