//! lopdf-backed document codec
//!
//! `SourceDocument` is a parsed input, `OutputDocument` is the document being
//! assembled. Pages are copied by importing every object of the source under
//! fresh ids and re-parenting the selected page dictionaries onto the output
//! page tree. Objects nothing points to are pruned on save.

use crate::error::MergeError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guards parent-chain walks against cyclic page trees
const MAX_TREE_DEPTH: usize = 64;

/// Page dimensions in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn from_box(media_box: [f32; 4]) -> Self {
        Self {
            width: (media_box[2] - media_box[0]).abs(),
            height: (media_box[3] - media_box[1]).abs(),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// A parsed input document
pub struct SourceDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Parse PDF bytes. Encrypted or page-less documents are rejected.
    pub fn load(name: &str, bytes: &[u8]) -> Result<Self, MergeError> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(MergeError::load_failed(name, "missing %PDF- header"));
        }

        let document = Document::load_mem(bytes).map_err(|e| MergeError::load_failed(name, e))?;

        if document.is_encrypted() {
            return Err(MergeError::load_failed(name, "document is password protected"));
        }

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(MergeError::load_failed(name, "document has no pages"));
        }

        Ok(Self { document, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Zero-based indices of every page, in document order
    pub fn page_indices(&self) -> Vec<usize> {
        (0..self.page_ids.len()).collect()
    }

    pub fn page_size(&self, index: usize) -> Option<PageSize> {
        let page_id = *self.page_ids.get(index)?;
        let dict = self.document.get_dictionary(page_id).ok()?;
        let media_box = inherited_attribute(&self.document, dict, b"MediaBox")
            .and_then(|obj| parse_box(&self.document, &obj));
        Some(media_box.map(PageSize::from_box).unwrap_or(PageSize::LETTER))
    }

    /// The underlying lopdf document, for metadata lookups
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// The document being assembled
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    sizes: Vec<PageSize>,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(0)),
            ("Kids", Object::Array(vec![])),
        ]);
        document.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = document.add_object(catalog);
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            pages_id,
            kids: Vec::new(),
            sizes: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    pub fn last_page_size(&self) -> Option<PageSize> {
        self.sizes.last().copied()
    }

    /// Append the pages at `indices` of `source`, in the given order.
    ///
    /// Returns the number of pages added.
    pub fn copy_pages(
        &mut self,
        source: &SourceDocument,
        indices: &[usize],
    ) -> Result<usize, MergeError> {
        let page_ids = indices
            .iter()
            .map(|&index| {
                source.page_ids.get(index).copied().ok_or_else(|| {
                    MergeError::OperationError(format!(
                        "page index {} out of range ({} pages)",
                        index,
                        source.page_count()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if page_ids.is_empty() {
            return Ok(0);
        }

        let src = source.document();
        let offset = self.document.max_id;

        // Import every object under remapped ids; unused ones get pruned on save
        let mut remapped = BTreeMap::new();
        for (old_id, object) in src.objects.iter() {
            let new_id = (old_id.0 + offset, old_id.1);
            remapped.insert(new_id, remap_object_refs(object.clone(), offset));
        }
        self.document.objects.extend(remapped);
        self.document.max_id = self.document.max_id.max(src.max_id + offset);

        let mut used = HashSet::new();
        for old_page_id in page_ids {
            let source_dict = src.get_dictionary(old_page_id).map_err(|e| {
                MergeError::OperationError(format!("page {:?} unreadable: {}", old_page_id, e))
            })?;

            let mut page = source_dict.clone();
            for key in INHERITABLE_KEYS {
                if page.has(key) {
                    continue;
                }
                if let Some(value) = inherited_attribute(src, source_dict, key) {
                    page.set(key.to_vec(), value);
                }
            }

            let size = page
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| parse_box(src, obj))
                .map(PageSize::from_box)
                .unwrap_or(PageSize::LETTER);

            remap_dict(&mut page, offset);
            page.set("Parent", Object::Reference(self.pages_id));

            let new_id = (old_page_id.0 + offset, old_page_id.1);
            let page_id = if used.insert(new_id) {
                self.document.objects.insert(new_id, Object::Dictionary(page));
                new_id
            } else {
                // Same page twice: each occurrence needs its own page object
                self.document.add_object(page)
            };

            self.kids.push(page_id);
            self.sizes.push(size);
        }

        Ok(indices.len())
    }

    /// Append an empty page with the given size
    pub fn add_blank_page(&mut self, size: PageSize) {
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(size.width),
                    Object::Real(size.height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
        ]);
        let page_id = self.document.add_object(page);
        self.kids.push(page_id);
        self.sizes.push(size);
    }

    /// Serialize the assembled document
    pub fn save(mut self, compress: bool) -> Result<Vec<u8>, MergeError> {
        let kids = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        match self.document.objects.get_mut(&self.pages_id) {
            Some(Object::Dictionary(pages)) => {
                pages.set("Kids", Object::Array(kids));
                pages.set("Count", Object::Integer(self.kids.len() as i64));
            }
            _ => {
                return Err(MergeError::OperationError(
                    "Invalid pages dictionary".into(),
                ))
            }
        }

        self.document.prune_objects();
        if compress {
            self.document.compress();
        }

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| MergeError::OperationError(format!("Save failed: {}", e)))?;

        Ok(buffer)
    }
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            remap_dict(&mut dict, offset);
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            remap_dict(&mut stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dict(dict: &mut Dictionary, offset: u32) {
    for (_, value) in dict.iter_mut() {
        let inner = std::mem::replace(value, Object::Null);
        *value = remap_object_refs(inner, offset);
    }
}

/// Look up `key` on the page or the nearest ancestor that defines it
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    if let Ok(value) = page.get(key) {
        return Some(value.clone());
    }

    let mut current = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        current = parent;
    }
    None
}

/// Parse a box array `[x1, y1, x2, y2]`, following an indirect reference
fn parse_box(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let array = obj.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }

    let mut result = [0.0; 4];
    for (slot, value) in result.iter_mut().zip(array) {
        *slot = match value {
            Object::Integer(n) => *n as f32,
            Object::Real(n) => *n,
            _ => return None,
        };
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{create_sized_pdf, create_test_pdf, page_widths};

    #[test]
    fn test_load_rejects_garbage() {
        let err = SourceDocument::load("bad.pdf", b"not a pdf").err().unwrap();
        assert!(matches!(err, MergeError::LoadFailed { .. }));
        assert!(err.to_string().contains("bad.pdf"));
    }

    #[test]
    fn test_load_reports_page_indices() {
        let source = SourceDocument::load("a.pdf", &create_test_pdf(4)).unwrap();
        assert_eq!(source.page_count(), 4);
        assert_eq!(source.page_indices(), vec![0, 1, 2, 3]);
        assert_eq!(source.page_size(0), Some(PageSize::LETTER));
        assert_eq!(source.page_size(4), None);
    }

    #[test]
    fn test_copy_pages_in_requested_order() {
        let source =
            SourceDocument::load("sized.pdf", &create_sized_pdf(&[100.0, 200.0, 300.0])).unwrap();
        let mut output = OutputDocument::new();
        let added = output.copy_pages(&source, &[2, 0]).unwrap();
        assert_eq!(added, 2);
        assert_eq!(output.last_page_size().unwrap().width, 100.0);

        let bytes = output.save(true).unwrap();
        assert_eq!(page_widths(&bytes), vec![300.0, 100.0]);
    }

    #[test]
    fn test_copy_same_page_twice() {
        let source = SourceDocument::load("a.pdf", &create_test_pdf(2)).unwrap();
        let mut output = OutputDocument::new();
        output.copy_pages(&source, &[1, 1]).unwrap();

        let bytes = output.save(false).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_copy_rejects_missing_index() {
        let source = SourceDocument::load("a.pdf", &create_test_pdf(2)).unwrap();
        let mut output = OutputDocument::new();
        assert!(output.copy_pages(&source, &[0, 7]).is_err());
        assert_eq!(output.page_count(), 0);
    }

    #[test]
    fn test_inherited_media_box_is_resolved() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
        ]));
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(420),
                    Object::Integer(595),
                ]),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let source = SourceDocument::load("a5.pdf", &bytes).unwrap();
        assert_eq!(source.page_size(0), Some(PageSize::new(420.0, 595.0)));

        let mut output = OutputDocument::new();
        output.copy_pages(&source, &[0]).unwrap();
        let merged = output.save(false).unwrap();
        assert_eq!(page_widths(&merged), vec![420.0]);
    }

    #[test]
    fn test_blank_page_has_requested_size() {
        let mut output = OutputDocument::new();
        output.add_blank_page(PageSize::A4);
        assert_eq!(output.page_count(), 1);
        assert_eq!(output.last_page_size(), Some(PageSize::A4));

        let bytes = output.save(true).unwrap();
        let widths = page_widths(&bytes);
        assert!((widths[0] - 595.28).abs() < 0.01);
    }

    #[test]
    fn test_parse_box_array() {
        let doc = Document::with_version("1.7");
        let array = Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(612.0),
            Object::Real(792.0),
        ]);
        assert_eq!(parse_box(&doc, &array), Some([0.0, 0.0, 612.0, 792.0]));
        assert_eq!(parse_box(&doc, &Object::Integer(3)), None);
    }
}
