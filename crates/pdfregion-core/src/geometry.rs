//! Bounding boxes, points, and transform matrices.
//!
//! Coordinates follow the top-left-origin convention: `top` and `bottom` are
//! distances from the top of the page, so `top <= bottom` for a well-formed
//! box. [`Ctm`] is the 2×3 affine matrix used by the content-stream
//! interpreter, which still works in PDF's bottom-left space; callers flip to
//! top-left coordinates when they know the page height.

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2×3 affine transformation matrix `[a b c d e f]`.
///
/// Transforms points as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`,
/// matching the PDF `cm` / `Tm` operand order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// A pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Compose two transforms: apply `self` first, then `after`.
    ///
    /// This is the PDF composition rule: `cm` prepends the operand matrix to
    /// the CTM, and glyph displacement prepends a translation to `Tm`.
    pub fn then(&self, after: &Ctm) -> Ctm {
        Ctm {
            a: self.a * after.a + self.b * after.c,
            b: self.a * after.b + self.b * after.d,
            c: self.c * after.a + self.d * after.c,
            d: self.c * after.b + self.d * after.d,
            e: self.e * after.a + self.f * after.c + after.e,
            f: self.e * after.b + self.f * after.d + after.f,
        }
    }

    /// Transform a point through this matrix.
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Clamp this box to the page bounds and canonical corner order.
    ///
    /// Each coordinate is clamped independently into `[0, page_width]` (x)
    /// or `[0, page_height]` (top/bottom); inverted corners are swapped
    /// afterwards. Never fails: arbitrary input (inverted, off-page,
    /// degenerate) always yields a well-formed rectangle, possibly of zero
    /// area.
    pub fn clamp_to_page(&self, page_width: f64, page_height: f64) -> BBox {
        let mut x0 = self.x0.clamp(0.0, page_width);
        let mut x1 = self.x1.clamp(0.0, page_width);
        let mut top = self.top.clamp(0.0, page_height);
        let mut bottom = self.bottom.clamp(0.0, page_height);

        if x1 < x0 {
            std::mem::swap(&mut x0, &mut x1);
        }
        if bottom < top {
            std::mem::swap(&mut top, &mut bottom);
        }

        BBox::new(x0, top, x1, bottom)
    }

    /// Inclusive intersection test.
    ///
    /// True when the boxes share any point, including edge contact and
    /// degenerate boxes. Used for vector primitives, whose extent may have
    /// zero width or height (hairline rules) and would never pass the
    /// strict positive-area test.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0.max(other.x0) <= self.x1.min(other.x1)
            && self.top.max(other.top) <= self.bottom.min(other.bottom)
    }

    /// Strict positive-area overlap test.
    ///
    /// Returns true iff the intersection of the two boxes has positive width
    /// and positive height. Boxes that merely touch along an edge or corner
    /// do not overlap; this keeps boundary-adjacent artwork out of region
    /// results.
    pub fn overlaps(&self, other: &BBox) -> bool {
        let inter_w = (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0);
        let inter_h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        inter_w > 0.0 && inter_h > 0.0
    }
}

// Serialized as a 4-element [x0, top, x1, bottom] array, matching the report
// format consumed downstream.
#[cfg(feature = "serde")]
impl serde::Serialize for BBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x0, self.top, self.x1, self.bottom).serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x0, top, x1, bottom) = <(f64, f64, f64, f64)>::deserialize(deserializer)?;
        Ok(BBox::new(x0, top, x1, bottom))
    }
}
