//! Add-time filtering and validation of incoming files
//!
//! Every candidate is parsed once when it is added so that unreadable or
//! password-protected files are rejected up front, one by one, instead of
//! failing the merge later.

use crate::codec::SourceDocument;
use crate::error::MergeError;
use crate::item::{FileItem, Item, SourceFile};
use std::sync::Arc;

/// A file handed over by the picker, drag-and-drop, or the command line
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            bytes,
        }
    }
}

/// Outcome of ingesting a batch of files
#[derive(Debug, Clone, Default)]
pub struct IntakeReport {
    /// Loadable files, in input order
    pub items: Vec<Item>,
    /// One `LoadFailed` per PDF that could not be read
    pub rejected: Vec<MergeError>,
    /// Names of files that are not PDFs
    pub skipped: Vec<String>,
    /// Number of files that looked like PDFs
    pub candidates: usize,
}

impl IntakeReport {
    pub fn accepted(&self) -> usize {
        self.items.len()
    }
}

/// Whether a file should be treated as a PDF, by MIME type or extension
pub fn is_pdf_candidate(name: &str, mime: Option<&str>) -> bool {
    mime == Some("application/pdf") || name.to_lowercase().ends_with(".pdf")
}

/// Load a file once to learn its page count
pub fn probe(name: &str, bytes: Vec<u8>) -> Result<FileItem, MergeError> {
    let page_count = SourceDocument::load(name, &bytes)?.page_count();
    let source = Arc::new(SourceFile::new(name, bytes));
    Ok(FileItem::new(source, Some(page_count)))
}

/// Filter and validate a batch of files, continuing past failures
pub fn ingest(files: Vec<IncomingFile>) -> IntakeReport {
    let mut report = IntakeReport::default();

    for file in files {
        if !is_pdf_candidate(&file.name, file.mime.as_deref()) {
            tracing::debug!("Skipping non-PDF file {}", file.name);
            report.skipped.push(file.name);
            continue;
        }
        report.candidates += 1;

        match probe(&file.name, file.bytes) {
            Ok(item) => {
                tracing::debug!(
                    "Accepted {} ({} pages)",
                    item.name(),
                    item.page_count.unwrap_or(0)
                );
                report.items.push(Item::File(item));
            }
            Err(e) => {
                tracing::warn!("{}", e);
                report.rejected.push(e);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_pdf;

    #[test]
    fn test_pdf_candidate_by_mime_or_extension() {
        assert!(is_pdf_candidate("report.pdf", None));
        assert!(is_pdf_candidate("REPORT.PDF", None));
        assert!(is_pdf_candidate("download", Some("application/pdf")));
        assert!(!is_pdf_candidate("image.png", Some("image/png")));
        assert!(!is_pdf_candidate("pdf", None));
    }

    #[test]
    fn test_probe_learns_page_count() {
        let item = probe("a.pdf", create_test_pdf(3)).unwrap();
        assert_eq!(item.page_count, Some(3));
        assert_eq!(item.name(), "a.pdf");
        assert!(!item.reverse_pages);
        assert_eq!(item.page_range, None);
    }

    #[test]
    fn test_ingest_continues_past_failures() {
        let report = ingest(vec![
            IncomingFile::new("good.pdf", None, create_test_pdf(2)),
            IncomingFile::new("corrupt.pdf", None, b"%PDF-1.7 garbage".to_vec()),
            IncomingFile::new("notes.txt", Some("text/plain"), b"hello".to_vec()),
            IncomingFile::new("second.pdf", None, create_test_pdf(1)),
        ]);

        assert_eq!(report.candidates, 3);
        assert_eq!(report.accepted(), 2);
        assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(
            &report.rejected[0],
            MergeError::LoadFailed { name, .. } if name == "corrupt.pdf"
        ));
    }
}
