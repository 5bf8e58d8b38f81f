//! Assembly of the merge list into one PDF
//!
//! A sequential fold over the items: file items copy their selected pages,
//! blank items add one empty page sized like the page before it.

use crate::codec::{OutputDocument, PageSize, SourceDocument};
use crate::error::MergeError;
use crate::item::{FileItem, Item};
use serde::Serialize;

/// Assembly settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssembleOptions {
    /// Size of a blank page when no page precedes it
    pub blank_page_size: PageSize,
    /// Compress streams before saving
    pub compress: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            blank_page_size: PageSize::A4,
            compress: true,
        }
    }
}

/// What an assembly run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub items: usize,
    pub pages: usize,
    pub blank_pages: usize,
    /// File items whose selection ended up empty
    pub skipped_items: usize,
    pub output_size_bytes: usize,
}

/// Merge `items` into a single PDF
pub fn assemble<'a, I>(items: I, options: &AssembleOptions) -> Result<Vec<u8>, MergeError>
where
    I: IntoIterator<Item = &'a Item>,
{
    assemble_with_report(items, options).map(|(bytes, _)| bytes)
}

/// Merge `items` into a single PDF and describe the result.
///
/// A source that fails to load aborts the whole run; no partial output is
/// returned.
pub fn assemble_with_report<'a, I>(
    items: I,
    options: &AssembleOptions,
) -> Result<(Vec<u8>, AssemblyReport), MergeError>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut output = OutputDocument::new();
    let mut report = AssemblyReport::default();

    for item in items {
        report.items += 1;
        match item {
            Item::File(file) => {
                let added = append_file(&mut output, file)?;
                if added == 0 {
                    report.skipped_items += 1;
                }
            }
            Item::Blank => {
                let size = output
                    .last_page_size()
                    .unwrap_or(options.blank_page_size);
                tracing::debug!("Adding blank page {}x{}", size.width, size.height);
                output.add_blank_page(size);
                report.blank_pages += 1;
            }
        }
    }

    if report.items == 0 {
        return Err(MergeError::EmptyOperation("no items to merge"));
    }

    report.pages = output.page_count();
    let bytes = output.save(options.compress)?;
    report.output_size_bytes = bytes.len();

    tracing::info!(
        "Assembled {} items into {} pages ({} bytes)",
        report.items,
        report.pages,
        report.output_size_bytes
    );

    Ok((bytes, report))
}

fn append_file(output: &mut OutputDocument, file: &FileItem) -> Result<usize, MergeError> {
    let source = SourceDocument::load(file.name(), &file.source.bytes)?;
    let available = source.page_count();

    let mut selected = match &file.page_range {
        Some(range) => {
            let valid: Vec<usize> = range
                .indices
                .iter()
                .copied()
                .filter(|&index| index < available)
                .collect();
            if valid.len() < range.indices.len() {
                tracing::warn!(
                    "{}: dropped {} stale page indices (document has {} pages)",
                    file.name(),
                    range.indices.len() - valid.len(),
                    available
                );
            }
            valid
        }
        None => source.page_indices(),
    };

    if file.reverse_pages {
        selected.reverse();
    }

    if selected.is_empty() {
        tracing::debug!("{}: nothing selected, skipping", file.name());
        return Ok(0);
    }

    tracing::debug!("{}: copying {} pages", file.name(), selected.len());
    output.copy_pages(&source, &selected)
}
