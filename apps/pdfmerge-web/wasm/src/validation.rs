//! PDF info extraction for the file list

use lopdf::Document;
use pdfmerge_core::{MergeError, SourceDocument};
use serde::Serialize;

/// PDF file information shown before the user commits to a merge
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PdfInfo {
    pub name: String,
    /// Number of pages in the document
    pub page_count: usize,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// File size in bytes
    pub size_bytes: usize,
    /// Width and height of the first page in points
    pub first_page_size: Option<(f32, f32)>,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

/// Load a PDF and describe it
pub fn validate_pdf(name: &str, bytes: &[u8]) -> Result<PdfInfo, MergeError> {
    let source = SourceDocument::load(name, bytes)?;
    let document = source.document();

    Ok(PdfInfo {
        name: name.to_string(),
        page_count: source.page_count(),
        version: document.version.clone(),
        size_bytes: bytes.len(),
        first_page_size: source.page_size(0).map(|size| (size.width, size.height)),
        title: info_entry(document, b"Title"),
        author: info_entry(document, b"Author"),
    })
}

/// Read a text entry of the trailer's Info dictionary
fn info_entry(document: &Document, key: &[u8]) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.get_dictionary(info_id).ok()?;
    let value = info.get(key).ok()?.as_str().ok()?;

    let decoded = String::from_utf8_lossy(value);
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfmerge_core::test_util::create_test_pdf;
    use lopdf::{Dictionary, Object, StringFormat};

    #[test]
    fn test_validate_pdf_returns_page_count() {
        let info = validate_pdf("a.pdf", &create_test_pdf(5)).unwrap();
        assert_eq!(info.page_count, 5);
        assert_eq!(info.version, "1.7");
        assert_eq!(info.first_page_size, Some((612.0, 792.0)));
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_validate_pdf_rejects_invalid_data() {
        let err = validate_pdf("bad.pdf", b"not a valid pdf").unwrap_err();
        assert!(matches!(err, MergeError::LoadFailed { .. }));
    }

    #[test]
    fn test_validate_pdf_reads_title() {
        let bytes = create_test_pdf(1);
        let mut doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::String(b"Quarterly".to_vec(), StringFormat::Literal),
        )]));
        doc.trailer.set("Info", Object::Reference(info_id));
        let mut with_info = Vec::new();
        doc.save_to(&mut with_info).unwrap();

        let info = validate_pdf("q.pdf", &with_info).unwrap();
        assert_eq!(info.title.as_deref(), Some("Quarterly"));
        assert_eq!(info.author, None);
    }
}
