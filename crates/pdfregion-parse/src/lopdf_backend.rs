//! lopdf-backed document loading and page parsing.
//!
//! [`LoadedDocument`] owns the parsed [`lopdf::Document`] and the page id
//! list, and turns a page index into a [`ParsedPage`] by running the content
//! stream interpreter under the page's MediaBox.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfregion_core::{Ctm, PdfError};

use crate::error::BackendError;
use crate::interpreter::{Interpreter, PageContent};

/// Upper bound on the page-tree /Parent chain walk.
const MAX_PARENT_DEPTH: usize = 64;

/// A parsed PDF document with its page list cached in document order.
#[derive(Debug)]
pub struct LoadedDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

/// One page's dimensions and extracted content.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Flat collections extracted from the content streams.
    pub content: PageContent,
}

impl LoadedDocument {
    /// Parse a PDF from memory.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

        Ok(Self { doc, page_ids })
    }

    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId, BackendError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(BackendError::Core(PdfError::PageOutOfRange {
                page: index,
                page_count: self.page_ids.len(),
            }))
    }

    /// Parse the page at `index` (0-based).
    pub fn parse_page(&self, index: usize) -> Result<ParsedPage, BackendError> {
        let page_id = self.page_id(index)?;

        let [mx0, my0, mx1, my1] = self.media_box(page_id)?;
        let width = mx1 - mx0;
        let height = my1 - my0;

        let page_dict = self
            .doc
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content_bytes = get_page_content_bytes(&self.doc, page_dict)?;
        let resources = get_page_resources(&self.doc, page_id)?;

        let mut interpreter = Interpreter::new(&self.doc, height);
        // Shift a non-zero MediaBox origin to (0, 0)
        interpreter.run(&content_bytes, resources, Ctm::translation(-mx0, -my0), 0)?;

        Ok(ParsedPage {
            width,
            height,
            content: interpreter.out,
        })
    }

    /// MediaBox of a page, inherited through the page tree, normalized so
    /// that the first corner is the lower-left.
    fn media_box(&self, page_id: ObjectId) -> Result<[f64; 4], BackendError> {
        let obj = resolve_inherited(&self.doc, page_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let obj = resolve_ref(&self.doc, obj);
        let array = obj
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        if array.len() < 4 {
            return Err(BackendError::Parse(format!(
                "MediaBox has {} entries, expected 4",
                array.len()
            )));
        }

        let mut nums = [0.0; 4];
        for (slot, obj) in nums.iter_mut().zip(array) {
            *slot = crate::font::number_or(resolve_ref(&self.doc, obj), 0.0);
        }
        let [x0, y0, x1, y1] = nums;
        Ok([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
    }
}

/// Walk the /Parent chain looking for an inheritable page attribute.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    for _ in 0..MAX_PARENT_DEPTH {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse(
        "page tree /Parent chain too deep".to_string(),
    ))
}

/// Get the content stream bytes from a page dictionary.
///
/// Handles both single stream references and arrays of stream references.
fn get_page_content_bytes(
    doc: &Document,
    page_dict: &Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let contents_obj = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()), // Page with no content
    };

    match contents_obj {
        Object::Reference(id) => {
            let obj = doc
                .get_object(*id)
                .map_err(|e| BackendError::Parse(format!("failed to resolve /Contents: {e}")))?;
            let stream = obj
                .as_stream()
                .map_err(|e| BackendError::Parse(format!("/Contents is not a stream: {e}")))?;
            decode_content_stream(stream)
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for item in arr {
                let id = item.as_reference().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a reference: {e}"))
                })?;
                let obj = doc.get_object(id).map_err(|e| {
                    BackendError::Parse(format!("failed to resolve /Contents stream: {e}"))
                })?;
                let stream = obj.as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_content_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a reference or array".to_string(),
        )),
    }
}

/// Decode a content stream, decompressing if needed.
fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Get the resources dictionary for a page, handling inheritance.
fn get_page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => {
            static EMPTY_DICT: std::sync::LazyLock<Dictionary> =
                std::sync::LazyLock::new(Dictionary::new);
            Ok(&EMPTY_DICT)
        }
    }
}

/// Resolve an indirect reference, leaving direct objects untouched.
fn resolve_ref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    crate::font::resolve(doc, obj)
}
