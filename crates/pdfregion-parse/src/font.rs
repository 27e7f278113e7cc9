//! Simple-font metrics and byte decoding.
//!
//! Glyph widths come from the font dictionary's /Widths array when present,
//! falling back to /MissingWidth from the descriptor and finally to a flat
//! default. Text bytes are decoded as windows-1252, which covers the
//! WinAnsi encoding of the standard simple fonts; composite (CID) fonts are
//! decoded byte-wise on the same path, which is approximate but keeps the
//! interpreter total.

use std::borrow::Cow;

use lopdf::{Dictionary, Document, Object};

/// Default glyph width in glyph-space units (per mille of the font size).
const DEFAULT_WIDTH: f64 = 500.0;
/// Courier is the only standard fixed-pitch family; its advance is wider.
const COURIER_WIDTH: f64 = 600.0;

/// Width metrics for one font resource.
#[derive(Debug, Clone)]
pub(crate) struct FontInfo {
    /// Base font name, or the resource name when /BaseFont is absent.
    pub name: String,
    first_char: i64,
    widths: Vec<f64>,
    missing_width: f64,
}

impl FontInfo {
    /// A fallback font used when the resource cannot be resolved.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            name: resource_name.to_string(),
            first_char: 0,
            widths: Vec::new(),
            missing_width: DEFAULT_WIDTH,
        }
    }

    /// Load metrics for the font resource `resource_name`.
    ///
    /// Missing or malformed entries degrade to defaults; loading never
    /// fails.
    pub fn load(doc: &Document, resources: &Dictionary, resource_name: &str) -> Self {
        let Some(font_dict) = lookup_font_dict(doc, resources, resource_name) else {
            return Self::fallback(resource_name);
        };

        let name = font_dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name_str().ok())
            .unwrap_or(resource_name)
            .to_string();

        let first_char = font_dict
            .get(b"FirstChar")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);

        let widths = font_dict
            .get(b"Widths")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| number_or(resolve(doc, o), DEFAULT_WIDTH))
                    .collect()
            })
            .unwrap_or_default();

        let missing_width = font_dict
            .get(b"FontDescriptor")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .map(|o| number_or(resolve(doc, o), DEFAULT_WIDTH))
            .unwrap_or(if name.contains("Courier") {
                COURIER_WIDTH
            } else {
                DEFAULT_WIDTH
            });

        Self {
            name,
            first_char,
            widths,
            missing_width,
        }
    }

    /// Glyph advance for a character code, in per-mille of the font size.
    pub fn glyph_width(&self, code: u8) -> f64 {
        let index = code as i64 - self.first_char;
        if index >= 0 {
            if let Some(&w) = self.widths.get(index as usize) {
                return w;
            }
        }
        self.missing_width
    }
}

/// Decode a PDF string's bytes as windows-1252 text.
///
/// The encoding is single-byte, so the result has exactly one char per input
/// byte (undefined bytes map to U+FFFD).
pub(crate) fn decode_text_bytes(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

fn lookup_font_dict<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    resource_name: &str,
) -> Option<&'a Dictionary> {
    let fonts = resources.get(b"Font").ok().map(|o| resolve(doc, o))?;
    let entry = fonts.as_dict().ok()?.get(resource_name.as_bytes()).ok()?;
    resolve(doc, entry).as_dict().ok()
}

/// Follow an indirect reference, returning the object itself when it is
/// direct or the reference is dangling.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(resolved) => resolved,
            Err(_) => obj,
        },
        other => other,
    }
}

/// Convert a numeric object (Integer or Real) to f64, with a default.
pub(crate) fn number_or(obj: &Object, default: f64) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(f) => *f as f64,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn fallback_width_is_default() {
        let font = FontInfo::fallback("F1");
        assert_eq!(font.glyph_width(b'A'), DEFAULT_WIDTH);
        assert_eq!(font.name, "F1");
    }

    #[test]
    fn widths_array_lookup() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(722), Object::Integer(667)],
        });
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let font = FontInfo::load(&doc, &resources, "F1");
        assert_eq!(font.name, "Helvetica");
        assert_eq!(font.glyph_width(65), 722.0); // 'A'
        assert_eq!(font.glyph_width(66), 667.0); // 'B'
        assert_eq!(font.glyph_width(67), DEFAULT_WIDTH); // past the array
        assert_eq!(font.glyph_width(32), DEFAULT_WIDTH); // before FirstChar
    }

    #[test]
    fn courier_missing_width() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier-Bold",
        });
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let font = FontInfo::load(&doc, &resources, "F1");
        assert_eq!(font.glyph_width(b'A'), COURIER_WIDTH);
    }

    #[test]
    fn unknown_resource_degrades_to_fallback() {
        let doc = Document::with_version("1.5");
        let resources = dictionary! {};
        let font = FontInfo::load(&doc, &resources, "F9");
        assert_eq!(font.name, "F9");
        assert_eq!(font.glyph_width(b'x'), DEFAULT_WIDTH);
    }

    #[test]
    fn decode_ascii_bytes() {
        assert_eq!(decode_text_bytes(b"Hello"), "Hello");
    }

    #[test]
    fn decode_is_one_char_per_byte() {
        let bytes: Vec<u8> = (1..=255).collect();
        let text = decode_text_bytes(&bytes);
        assert_eq!(text.chars().count(), bytes.len());
    }
}
