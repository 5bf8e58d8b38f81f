//! Merge list entries

use crate::range::PageRange;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Raw bytes of a user-supplied document, shared between split siblings
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// A document reference with an optional page subset
#[derive(Debug, Clone, PartialEq)]
pub struct FileItem {
    pub source: Arc<SourceFile>,
    /// `None` when the page count could not be determined
    pub page_count: Option<usize>,
    pub reverse_pages: bool,
    pub page_range: Option<PageRange>,
}

impl FileItem {
    pub fn new(source: Arc<SourceFile>, page_count: Option<usize>) -> Self {
        Self {
            source,
            page_count,
            reverse_pages: false,
            page_range: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    /// Zero-based pages this item contributes, in output order
    pub fn effective_page_sequence(&self) -> Vec<usize> {
        let mut pages = match &self.page_range {
            Some(range) => range.indices.clone(),
            None => (0..self.page_count.unwrap_or(0)).collect(),
        };
        if self.reverse_pages {
            pages.reverse();
        }
        pages
    }

    pub fn display_page_count(&self) -> usize {
        match &self.page_range {
            Some(range) => range.len(),
            None => self.page_count.unwrap_or(0),
        }
    }

    /// Source size prorated by the share of selected pages.
    ///
    /// This is an approximation: pages rarely weigh the same.
    pub fn display_byte_estimate(&self) -> usize {
        let size = self.source.size_bytes();
        match (&self.page_range, self.page_count) {
            (Some(range), Some(total)) if total > 0 => {
                let ratio = range.len() as f64 / total as f64;
                (size as f64 * ratio).round() as usize
            }
            _ => size,
        }
    }
}

/// One entry in the merge list
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    File(FileItem),
    /// A blank page sized like the page before it
    Blank,
}

impl Item {
    pub fn file(source: Arc<SourceFile>, page_count: Option<usize>) -> Self {
        Item::File(FileItem::new(source, page_count))
    }

    pub fn as_file(&self) -> Option<&FileItem> {
        match self {
            Item::File(file) => Some(file),
            Item::Blank => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileItem> {
        match self {
            Item::File(file) => Some(file),
            Item::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Item::Blank)
    }

    /// Page indices taken from a source document; `None` for blank pages
    pub fn effective_page_sequence(&self) -> Option<Vec<usize>> {
        self.as_file().map(FileItem::effective_page_sequence)
    }

    pub fn display_page_count(&self) -> usize {
        match self {
            Item::File(file) => file.display_page_count(),
            Item::Blank => 1,
        }
    }

    pub fn display_byte_estimate(&self) -> Option<usize> {
        self.as_file().map(FileItem::display_byte_estimate)
    }

    /// Serializable snapshot for the presentation layer
    pub fn view(&self, position: usize) -> ItemView {
        match self {
            Item::File(file) => ItemView {
                position,
                kind: ItemKind::File,
                name: file.name().to_string(),
                page_count: file.page_count,
                selected_pages: file.display_page_count(),
                range: file.page_range.as_ref().map(|r| r.raw.clone()),
                reverse_pages: file.reverse_pages,
                size_bytes: Some(file.source.size_bytes()),
                estimated_bytes: Some(file.display_byte_estimate()),
            },
            Item::Blank => ItemView {
                position,
                kind: ItemKind::Blank,
                name: String::new(),
                page_count: None,
                selected_pages: 1,
                range: None,
                reverse_pages: false,
                size_bytes: None,
                estimated_bytes: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Blank,
}

/// Item info for rendering the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub position: usize,
    pub kind: ItemKind,
    pub name: String,
    pub page_count: Option<usize>,
    pub selected_pages: usize,
    pub range: Option<String>,
    pub reverse_pages: bool,
    pub size_bytes: Option<usize>,
    pub estimated_bytes: Option<usize>,
}
