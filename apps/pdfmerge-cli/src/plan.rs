//! Builds a merge list from command line items and writes the result

use crate::item_arg::{ItemArg, SplitArg};
use anyhow::{bail, Context, Result};
use pdfmerge_core::{
    assemble_with_report, format_bytes, AssembleOptions, AssemblyReport, IncomingFile, IntakeMode,
    ItemKind, MergeError, MergeList,
};
use std::fs;
use std::path::Path;

/// Load every item into a fresh list, applying ranges and reverse flags
pub fn build_list(items: &[ItemArg]) -> Result<MergeList> {
    let mut list = MergeList::new();

    for item in items {
        match item {
            ItemArg::Blank => list.push_blank(),
            ItemArg::File {
                path,
                range,
                reverse,
            } => {
                if !add_file(&mut list, path)? {
                    continue;
                }
                let index = list.len() - 1;
                if let Some(range) = range {
                    list.set_range(index, Some(range.as_str()))
                        .with_context(|| format!("{}: page range {:?}", path.display(), range))?;
                }
                if *reverse {
                    list.toggle_reverse(index)?;
                }
            }
        }
    }

    Ok(list)
}

/// Returns false when the file was skipped rather than added
fn add_file(list: &mut MergeList, path: &Path) -> Result<bool> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let report = list.ingest(vec![IncomingFile::new(name, None, bytes)], IntakeMode::Append);
    for skipped in &report.skipped {
        tracing::warn!("Skipping {}: not a PDF", skipped);
    }
    for rejected in &report.rejected {
        tracing::warn!("{}", rejected);
    }
    Ok(report.accepted() > 0)
}

/// Apply `--split` arguments in order, each against the list as it stands
pub fn apply_splits(list: &mut MergeList, splits: &[SplitArg]) -> Result<()> {
    for split in splits {
        list.split(split.position - 1, split.after)
            .with_context(|| format!("--split {}:{}", split.position, split.after))?;
    }
    Ok(())
}

/// One line per item, then a summary line
pub fn describe(list: &MergeList) -> String {
    let mut out = String::new();
    for view in list.views() {
        let line = match view.kind {
            ItemKind::Blank => format!("{:>3}. [blank page]\n", view.position + 1),
            ItemKind::File => {
                let pages = match view.page_count {
                    Some(total) => format!("{}/{} pages", view.selected_pages, total),
                    None => "? pages".to_string(),
                };
                let range = view
                    .range
                    .as_deref()
                    .map(|r| format!(" [{}]", r))
                    .unwrap_or_default();
                let reverse = if view.reverse_pages { " reversed" } else { "" };
                let size = view
                    .estimated_bytes
                    .map(format_bytes)
                    .unwrap_or_default();
                format!(
                    "{:>3}. {} ({}{}{}) ~{}\n",
                    view.position + 1,
                    view.name,
                    pages,
                    range,
                    reverse,
                    size
                )
            }
        };
        out.push_str(&line);
    }

    let summary = list.summary();
    out.push_str(&format!(
        "{} file(s), {} blank page(s), {} page(s) total\n",
        summary.file_count, summary.blank_count, summary.total_pages
    ));
    out
}

/// Assemble the list and write it to `output`
pub fn write_merged(
    list: &MergeList,
    options: &AssembleOptions,
    output: &Path,
) -> Result<AssemblyReport> {
    let (bytes, report) = match assemble_with_report(list, options) {
        Ok(result) => result,
        Err(e) if e.is_no_op() => bail!("Nothing to merge: {}", e),
        Err(e) => return Err(anyhow::Error::new(e).context("Merge failed")),
    };

    fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(report)
}

/// Reverse the item order, treating an empty list as a warning
pub fn reverse_order(list: &mut MergeList) -> Result<()> {
    match list.reverse_all() {
        Ok(()) => Ok(()),
        Err(e @ MergeError::EmptyOperation(_)) => {
            tracing::warn!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
