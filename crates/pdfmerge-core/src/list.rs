//! Ordered merge list
//!
//! `MergeList` owns the items and is the only way to change them. The
//! presentation layer re-reads the list after every call.

use crate::error::MergeError;
use crate::intake::{self, IncomingFile, IntakeReport};
use crate::item::{FileItem, Item, ItemView};
use crate::range::{parse_page_indices, PageRange};
use serde::Serialize;

/// Counts shown in the summary bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub file_count: usize,
    pub blank_count: usize,
    pub total_pages: usize,
}

/// How newly ingested files combine with the current list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeMode {
    /// Drag-and-drop: add after the existing items
    Append,
    /// File picker: the selection becomes the whole list
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeList {
    items: Vec<Item>,
}

impl MergeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn append(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    pub fn replace(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items = items.into_iter().collect();
    }

    pub fn push_blank(&mut self) {
        self.items.push(Item::Blank);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Validate incoming files and add the loadable ones.
    ///
    /// Files that fail to load are reported and skipped. When nothing in
    /// `files` looks like a PDF the list is left as it is, even in
    /// `Replace` mode.
    pub fn ingest(&mut self, files: Vec<IncomingFile>, mode: IntakeMode) -> IntakeReport {
        let mut report = intake::ingest(files);
        if report.candidates == 0 {
            return report;
        }

        let items = std::mem::take(&mut report.items);
        match mode {
            IntakeMode::Append => self.append(items),
            IntakeMode::Replace => self.replace(items),
        }
        report
    }

    pub fn remove(&mut self, index: usize) -> Result<Item, MergeError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn reverse_all(&mut self) -> Result<(), MergeError> {
        if self.items.is_empty() {
            return Err(MergeError::EmptyOperation("no items to reverse"));
        }
        self.items.reverse();
        Ok(())
    }

    /// Move the item at `from` so it lands before the item currently at `to`.
    ///
    /// `to` may equal the list length to move to the end. Returns `false`
    /// when the drop position leaves the order unchanged.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool, MergeError> {
        self.check_index(from)?;
        if to > self.items.len() {
            return Err(MergeError::IndexOutOfBounds {
                index: to,
                len: self.items.len(),
            });
        }

        if to == from || to == from + 1 {
            return Ok(false);
        }

        let moved = self.items.remove(from);
        let target = if to > from { to - 1 } else { to };
        self.items.insert(target, moved);
        Ok(true)
    }

    /// Set or clear the page range of a file item.
    ///
    /// Blank or missing input clears the range. Input that selects nothing
    /// is rejected and the previous range is kept.
    pub fn set_range(&mut self, index: usize, raw: Option<&str>) -> Result<(), MergeError> {
        let file = self.file_mut(index, |_| {
            MergeError::InvalidRange("blank pages have no page range".into())
        })?;

        let input = raw.map(str::trim).unwrap_or_default();
        if input.is_empty() {
            file.page_range = None;
            return Ok(());
        }

        let page_count = file.page_count.ok_or_else(|| {
            MergeError::InvalidRange(format!(
                "page count of {} is unknown",
                file.source.name
            ))
        })?;

        match PageRange::parse(input, page_count) {
            Some(range) => {
                file.page_range = Some(range);
                Ok(())
            }
            None => {
                // Report the malformed segment when there is one
                parse_page_indices(input, page_count)?;
                Err(MergeError::InvalidRange(format!(
                    "{:?} selects no pages (document has {} pages)",
                    input, page_count
                )))
            }
        }
    }

    /// Flip page reversal for a file item and return the new setting.
    ///
    /// Blank pages are left untouched and report `false`.
    pub fn toggle_reverse(&mut self, index: usize) -> Result<bool, MergeError> {
        self.check_index(index)?;
        match self.items[index].as_file_mut() {
            Some(file) => {
                file.reverse_pages = !file.reverse_pages;
                Ok(file.reverse_pages)
            }
            None => Ok(false),
        }
    }

    /// Replace the file item at `index` with two items holding the first
    /// `split_after` pages of its effective sequence and the rest.
    ///
    /// Both halves are stored as ascending ranges without reversal.
    pub fn split(&mut self, index: usize, split_after: usize) -> Result<(), MergeError> {
        let file = self.file_mut(index, |_| {
            MergeError::InvalidSplit("blank pages cannot be split".into())
        })?;

        match file.page_count {
            Some(count) if count >= 2 => {}
            _ => {
                return Err(MergeError::InvalidSplit(format!(
                    "{} needs at least 2 known pages",
                    file.source.name
                )))
            }
        }

        let sequence = file.effective_page_sequence();
        if sequence.len() < 2 {
            return Err(MergeError::InvalidSplit(
                "selection has fewer than 2 pages".into(),
            ));
        }
        if split_after == 0 || split_after >= sequence.len() {
            return Err(MergeError::InvalidSplit(format!(
                "split point must be between 1 and {}",
                sequence.len() - 1
            )));
        }

        let (head, tail) = sequence.split_at(split_after);
        let make_part = |pages: &[usize]| {
            Item::File(FileItem {
                source: file.source.clone(),
                page_count: file.page_count,
                reverse_pages: false,
                page_range: PageRange::from_indices(pages),
            })
        };
        let parts = [make_part(head), make_part(tail)];

        self.items.splice(index..=index, parts);
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            match item {
                Item::File(_) => summary.file_count += 1,
                Item::Blank => summary.blank_count += 1,
            }
            summary.total_pages += item.display_page_count();
        }
        summary
    }

    pub fn views(&self) -> Vec<ItemView> {
        self.items
            .iter()
            .enumerate()
            .map(|(position, item)| item.view(position))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), MergeError> {
        if index >= self.items.len() {
            return Err(MergeError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn file_mut(
        &mut self,
        index: usize,
        on_blank: impl FnOnce(usize) -> MergeError,
    ) -> Result<&mut FileItem, MergeError> {
        self.check_index(index)?;
        self.items[index].as_file_mut().ok_or_else(|| on_blank(index))
    }
}

impl<'a> IntoIterator for &'a MergeList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
