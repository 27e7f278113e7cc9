//! Content stream interpreter.
//!
//! Walks a page's operator stream and accumulates the flat collections the
//! region analyses need: positioned characters, classified vector primitives
//! (line / rect / curve extents), and placed images. Graphics state is a CTM
//! stack; text state follows the PDF text-positioning model. Glyph boxes are
//! approximate (full font size above the baseline), which is sufficient for
//! band-based line grouping.
//!
//! All geometry is emitted in top-left-origin page coordinates; the y flip
//! happens at emission using the page height.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use pdfregion_core::{BBox, Char, Ctm, PageImage, Point};

use crate::error::BackendError;
use crate::font::{FontInfo, decode_text_bytes, resolve};

/// Maximum Form XObject nesting depth.
const MAX_FORM_DEPTH: usize = 8;

/// Everything extracted from one page's content streams.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Positioned characters in content-stream order.
    pub chars: Vec<Char>,
    /// Extents of straight line primitives.
    pub lines: Vec<BBox>,
    /// Extents of rectangle primitives.
    pub rects: Vec<BBox>,
    /// Extents of curve (Bézier) primitives.
    pub curves: Vec<BBox>,
    /// Placed images in content-stream order.
    pub images: Vec<PageImage>,
}

/// Text-positioning state (PDF 9.3).
#[derive(Debug, Clone)]
struct TextState {
    font_res: String,
    size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scaling: f64,
    leading: f64,
    rise: f64,
    tm: Ctm,
    tlm: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_res: String::new(),
            size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
            tm: Ctm::identity(),
            tlm: Ctm::identity(),
        }
    }
}

impl TextState {
    fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.tlm = Ctm::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn move_to_next_line(&mut self) {
        self.move_text_position(0.0, -self.leading);
    }
}

/// Accumulates the current path in device space until a painting operator.
#[derive(Debug, Default)]
struct PathBuilder {
    /// Straight segments, as device-space endpoint pairs.
    segments: Vec<(Point, Point)>,
    /// Device-space points of curve segments, control points included.
    curve_points: Vec<Point>,
    /// Extents of `re` subpaths, as device-space `[xmin, ymin, xmax, ymax]`.
    re_extents: Vec<[f64; 4]>,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl PathBuilder {
    fn move_to(&mut self, p: Point) {
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    fn line_to(&mut self, p: Point) {
        if let Some(from) = self.current {
            self.segments.push((from, p));
        }
        self.current = Some(p);
    }

    fn curve_to(&mut self, controls: &[Point], end: Point) {
        if let Some(from) = self.current {
            self.curve_points.push(from);
        }
        self.curve_points.extend_from_slice(controls);
        self.curve_points.push(end);
        self.current = Some(end);
    }

    fn rectangle(&mut self, corners: [Point; 4]) {
        let xs = corners.map(|p| p.x);
        let ys = corners.map(|p| p.y);
        self.re_extents.push([
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ]);
        // `re` starts a new subpath at its lower-left corner
        self.current = Some(corners[0]);
        self.subpath_start = Some(corners[0]);
    }

    fn close(&mut self) {
        if let (Some(from), Some(start)) = (self.current, self.subpath_start) {
            if from != start {
                self.segments.push((from, start));
            }
        }
        self.current = self.subpath_start;
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.curve_points.clear();
        self.re_extents.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.curve_points.is_empty() && self.re_extents.is_empty()
    }

    /// True when the straight segments form one closed axis-aligned
    /// rectangle outline (the common way table cells are drawn without
    /// `re`).
    fn segments_form_rect(&self) -> bool {
        if self.segments.len() != 4 {
            return false;
        }
        let eps = 1e-6;
        for i in 0..4 {
            let (a, b) = self.segments[i];
            let axis_aligned = (a.x - b.x).abs() < eps || (a.y - b.y).abs() < eps;
            if !axis_aligned {
                return false;
            }
            let (next_start, _) = self.segments[(i + 1) % 4];
            if (b.x - next_start.x).abs() > eps || (b.y - next_start.y).abs() > eps {
                return false;
            }
        }
        true
    }
}

/// Extent of a point set, as `[xmin, ymin, xmax, ymax]`.
fn extent(points: impl Iterator<Item = Point>) -> Option<[f64; 4]> {
    let mut ext: Option<[f64; 4]> = None;
    for p in points {
        ext = Some(match ext {
            None => [p.x, p.y, p.x, p.y],
            Some([x0, y0, x1, y1]) => [x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)],
        });
    }
    ext
}

pub(crate) struct Interpreter<'a> {
    doc: &'a Document,
    page_height: f64,
    font_cache: HashMap<String, FontInfo>,
    pub out: PageContent,
}

impl<'a> Interpreter<'a> {
    pub fn new(doc: &'a Document, page_height: f64) -> Self {
        Self {
            doc,
            page_height,
            font_cache: HashMap::new(),
            out: PageContent::default(),
        }
    }

    /// Flip a device-space extent into a top-left-origin [`BBox`].
    fn to_bbox(&self, ext: [f64; 4]) -> BBox {
        let [x0, y0, x1, y1] = ext;
        BBox::new(x0, self.page_height - y1, x1, self.page_height - y0)
    }

    /// Interpret one content stream under the given base CTM and resources.
    pub fn run(
        &mut self,
        stream_bytes: &[u8],
        resources: &Dictionary,
        base_ctm: Ctm,
        depth: usize,
    ) -> Result<(), BackendError> {
        if depth > MAX_FORM_DEPTH {
            return Err(BackendError::Interpreter(format!(
                "Form XObject recursion depth {depth} exceeds limit {MAX_FORM_DEPTH}"
            )));
        }

        let content = Content::decode(stream_bytes)
            .map_err(|e| BackendError::Interpreter(format!("content stream decode failed: {e}")))?;

        let mut ctm = base_ctm;
        let mut ts = TextState::default();
        let mut stack: Vec<(Ctm, TextState)> = Vec::new();
        let mut path = PathBuilder::default();

        for op in &content.operations {
            let ops = &op.operands;
            match op.operator.as_str() {
                // --- Graphics state ---
                "q" => stack.push((ctm, ts.clone())),
                "Q" => {
                    if let Some((saved_ctm, saved_ts)) = stack.pop() {
                        ctm = saved_ctm;
                        ts = saved_ts;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(ops) {
                        ctm = m.then(&ctm);
                    }
                }

                // --- Text state ---
                "BT" => {
                    ts.tm = Ctm::identity();
                    ts.tlm = Ctm::identity();
                }
                "ET" => {}
                "Tf" => {
                    if ops.len() >= 2 {
                        let name = ops[0].as_name_str().unwrap_or_default().to_string();
                        ts.size = get_f64(ops, 1).unwrap_or(0.0);
                        if !self.font_cache.contains_key(&name) {
                            let font = FontInfo::load(self.doc, resources, &name);
                            self.font_cache.insert(name.clone(), font);
                        }
                        ts.font_res = name;
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(ops) {
                        ts.tm = m;
                        ts.tlm = m;
                    }
                }
                "Td" => {
                    if ops.len() >= 2 {
                        let tx = get_f64(ops, 0).unwrap_or(0.0);
                        let ty = get_f64(ops, 1).unwrap_or(0.0);
                        ts.move_text_position(tx, ty);
                    }
                }
                "TD" => {
                    if ops.len() >= 2 {
                        let tx = get_f64(ops, 0).unwrap_or(0.0);
                        let ty = get_f64(ops, 1).unwrap_or(0.0);
                        ts.leading = -ty;
                        ts.move_text_position(tx, ty);
                    }
                }
                "T*" => ts.move_to_next_line(),
                "TL" => {
                    if let Some(v) = get_f64(ops, 0) {
                        ts.leading = v;
                    }
                }
                "Tc" => {
                    if let Some(v) = get_f64(ops, 0) {
                        ts.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let Some(v) = get_f64(ops, 0) {
                        ts.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let Some(v) = get_f64(ops, 0) {
                        ts.h_scaling = v / 100.0;
                    }
                }
                "Ts" => {
                    if let Some(v) = get_f64(ops, 0) {
                        ts.rise = v;
                    }
                }

                // --- Text showing ---
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = ops.first() {
                        self.show_text(bytes, &mut ts, &ctm);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = ops.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => self.show_text(bytes, &mut ts, &ctm),
                                Object::Integer(n) => self.adjust_tm(-(*n as f64), &mut ts),
                                Object::Real(n) => self.adjust_tm(-(*n as f64), &mut ts),
                                _ => {}
                            }
                        }
                    }
                }
                "'" => {
                    ts.move_to_next_line();
                    if let Some(Object::String(bytes, _)) = ops.first() {
                        self.show_text(bytes, &mut ts, &ctm);
                    }
                }
                "\"" => {
                    if ops.len() >= 3 {
                        if let Some(aw) = get_f64(ops, 0) {
                            ts.word_spacing = aw;
                        }
                        if let Some(ac) = get_f64(ops, 1) {
                            ts.char_spacing = ac;
                        }
                        ts.move_to_next_line();
                        if let Object::String(bytes, _) = &ops[2] {
                            self.show_text(bytes, &mut ts, &ctm);
                        }
                    }
                }

                // --- Path construction ---
                "m" => {
                    if let Some(p) = point_operand(ops, 0) {
                        path.move_to(ctm.transform_point(p));
                    }
                }
                "l" => {
                    if let Some(p) = point_operand(ops, 0) {
                        path.line_to(ctm.transform_point(p));
                    }
                }
                "c" => {
                    if let (Some(c1), Some(c2), Some(end)) = (
                        point_operand(ops, 0),
                        point_operand(ops, 2),
                        point_operand(ops, 4),
                    ) {
                        path.curve_to(
                            &[ctm.transform_point(c1), ctm.transform_point(c2)],
                            ctm.transform_point(end),
                        );
                    }
                }
                "v" | "y" => {
                    if let (Some(c1), Some(end)) = (point_operand(ops, 0), point_operand(ops, 2)) {
                        path.curve_to(&[ctm.transform_point(c1)], ctm.transform_point(end));
                    }
                }
                "re" => {
                    if ops.len() >= 4 {
                        let x = get_f64(ops, 0).unwrap_or(0.0);
                        let y = get_f64(ops, 1).unwrap_or(0.0);
                        let w = get_f64(ops, 2).unwrap_or(0.0);
                        let h = get_f64(ops, 3).unwrap_or(0.0);
                        path.rectangle([
                            ctm.transform_point(Point::new(x, y)),
                            ctm.transform_point(Point::new(x + w, y)),
                            ctm.transform_point(Point::new(x + w, y + h)),
                            ctm.transform_point(Point::new(x, y + h)),
                        ]);
                    }
                }
                "h" => path.close(),

                // --- Path painting ---
                "S" | "f" | "F" | "f*" | "B" | "B*" => self.emit_path(&mut path),
                "s" | "b" | "b*" => {
                    path.close();
                    self.emit_path(&mut path);
                }
                "n" => path.clear(),
                "W" | "W*" => {} // clipping path; the following paint op decides

                // --- XObjects ---
                "Do" => {
                    if let Some(name) = ops.first().and_then(|o| o.as_name_str().ok()) {
                        self.handle_do(resources, name, ctm, depth)?;
                    }
                }

                // Color, line style, marked content: irrelevant to region
                // metadata, skipped.
                _ => {}
            }
        }

        Ok(())
    }

    /// Classify and emit the current path, then reset it.
    fn emit_path(&mut self, path: &mut PathBuilder) {
        if path.is_empty() {
            path.clear();
            return;
        }

        if !path.curve_points.is_empty() {
            // Any curve segment makes the whole path a curve primitive.
            let all = path
                .curve_points
                .iter()
                .copied()
                .chain(path.segments.iter().flat_map(|&(a, b)| [a, b]))
                .chain(path.re_extents.iter().flat_map(|&[x0, y0, x1, y1]| {
                    [Point::new(x0, y0), Point::new(x1, y1)]
                }));
            if let Some(ext) = extent(all) {
                let bbox = self.to_bbox(ext);
                self.out.curves.push(bbox);
            }
        } else {
            for &ext in &path.re_extents {
                let bbox = self.to_bbox(ext);
                self.out.rects.push(bbox);
            }
            if path.segments_form_rect() {
                if let Some(ext) = extent(path.segments.iter().flat_map(|&(a, b)| [a, b])) {
                    let bbox = self.to_bbox(ext);
                    self.out.rects.push(bbox);
                }
            } else {
                for &(a, b) in &path.segments {
                    if let Some(ext) = extent([a, b].into_iter()) {
                        let bbox = self.to_bbox(ext);
                        self.out.lines.push(bbox);
                    }
                }
            }
        }

        path.clear();
    }

    /// Show a text string: emit one char per byte and advance the text
    /// matrix.
    fn show_text(&mut self, bytes: &[u8], ts: &mut TextState, ctm: &Ctm) {
        let font = match self.font_cache.get(&ts.font_res) {
            Some(font) => font.clone(),
            None => FontInfo::fallback(&ts.font_res),
        };

        let text = decode_text_bytes(bytes);
        for (ch, &code) in text.chars().zip(bytes) {
            let w0 = font.glyph_width(code) / 1000.0;
            let glyph_w = w0 * ts.size * ts.h_scaling;

            let trm = ts.tm.then(ctm);
            let corners = [
                trm.transform_point(Point::new(0.0, ts.rise)),
                trm.transform_point(Point::new(glyph_w, ts.rise)),
                trm.transform_point(Point::new(0.0, ts.rise + ts.size)),
                trm.transform_point(Point::new(glyph_w, ts.rise + ts.size)),
            ];
            if let Some(ext) = extent(corners.into_iter()) {
                // Effective size scales with the vertical magnitude of the
                // combined matrix.
                let v_scale = (trm.c * trm.c + trm.d * trm.d).sqrt();
                let bbox = self.to_bbox(ext);
                self.out.chars.push(Char {
                    text: ch.to_string(),
                    bbox,
                    fontname: font.name.clone(),
                    size: ts.size * v_scale,
                });
            }

            let mut advance = w0 * ts.size + ts.char_spacing;
            if code == b' ' {
                advance += ts.word_spacing;
            }
            ts.tm = Ctm::translation(advance * ts.h_scaling, 0.0).then(&ts.tm);
        }
    }

    /// TJ numeric adjustment, in thousandths of text-space units.
    fn adjust_tm(&self, amount: f64, ts: &mut TextState) {
        let tx = amount / 1000.0 * ts.size * ts.h_scaling;
        ts.tm = Ctm::translation(tx, 0.0).then(&ts.tm);
    }

    /// Dispatch a `Do` operator: record Image XObjects, recurse into Form
    /// XObjects. Unknown or unresolvable XObjects are skipped.
    fn handle_do(
        &mut self,
        resources: &Dictionary,
        name: &str,
        ctm: Ctm,
        depth: usize,
    ) -> Result<(), BackendError> {
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .map(|o| resolve(self.doc, o))
            .and_then(|o| o.as_dict().ok())
        else {
            return Ok(());
        };
        let Some(entry) = xobjects.get(name.as_bytes()).ok() else {
            return Ok(());
        };
        let Ok(stream) = resolve(self.doc, entry).as_stream() else {
            return Ok(());
        };

        let subtype = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name_str().ok())
            .unwrap_or("");

        match subtype {
            "Image" => {
                self.out.images.push(self.image_from_ctm(stream, name, &ctm));
                Ok(())
            }
            "Form" => {
                let form_ctm = stream
                    .dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|o| o.as_array().ok())
                    .and_then(|arr| matrix_operands(arr))
                    .unwrap_or_else(Ctm::identity);
                let form_resources = stream
                    .dict
                    .get(b"Resources")
                    .ok()
                    .map(|o| resolve(self.doc, o))
                    .and_then(|o| o.as_dict().ok())
                    .unwrap_or(resources);
                let data = if stream.dict.get(b"Filter").is_ok() {
                    stream.decompressed_content().map_err(|e| {
                        BackendError::Parse(format!("failed to decompress Form XObject: {e}"))
                    })?
                } else {
                    stream.content.clone()
                };
                self.run(&data, form_resources, form_ctm.then(&ctm), depth + 1)
            }
            _ => Ok(()),
        }
    }

    /// Place an Image XObject: the image occupies the unit square in form
    /// space, mapped to the page by the CTM active at the `Do` operator.
    fn image_from_ctm(&self, stream: &lopdf::Stream, name: &str, ctm: &Ctm) -> PageImage {
        let corners = [
            ctm.transform_point(Point::new(0.0, 0.0)),
            ctm.transform_point(Point::new(1.0, 0.0)),
            ctm.transform_point(Point::new(0.0, 1.0)),
            ctm.transform_point(Point::new(1.0, 1.0)),
        ];
        let ext = extent(corners.into_iter()).unwrap_or([0.0; 4]);
        let bbox = self.to_bbox(ext);

        let width = stream
            .dict
            .get(b"Width")
            .ok()
            .map(|o| resolve(self.doc, o))
            .and_then(|o| o.as_i64().ok())
            .map(|v| v as u32);
        let height = stream
            .dict
            .get(b"Height")
            .ok()
            .map(|o| resolve(self.doc, o))
            .and_then(|o| o.as_i64().ok())
            .map(|v| v as u32);
        let srcsize = width.zip(height);

        PageImage {
            bbox,
            width,
            height,
            name: Some(name.to_string()),
            srcsize,
        }
    }
}

/// Read the f64 operand at `index`, if present and numeric.
fn get_f64(operands: &[Object], index: usize) -> Option<f64> {
    match operands.get(index)? {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}

/// Read a point from two consecutive numeric operands.
fn point_operand(operands: &[Object], index: usize) -> Option<Point> {
    Some(Point::new(
        get_f64(operands, index)?,
        get_f64(operands, index + 1)?,
    ))
}

/// Read a 6-operand matrix, defaulting malformed entries like the identity.
fn matrix_operands(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    Some(Ctm::new(
        get_f64(operands, 0).unwrap_or(1.0),
        get_f64(operands, 1).unwrap_or(0.0),
        get_f64(operands, 2).unwrap_or(0.0),
        get_f64(operands, 3).unwrap_or(1.0),
        get_f64(operands, 4).unwrap_or(0.0),
        get_f64(operands, 5).unwrap_or(0.0),
    ))
}
