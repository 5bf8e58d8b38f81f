//! End-to-end: intake, list edits, assembly

use pdfmerge_core::test_util::{create_sized_pdf, page_widths};
use pdfmerge_core::{
    assemble, assemble_with_report, AssembleOptions, IncomingFile, IntakeMode, Item, MergeError,
    MergeList,
};
use pretty_assertions::assert_eq;

/// PDF whose page N has MediaBox width `base + N`
fn numbered_pdf(base: i64, pages: i64) -> Vec<u8> {
    let widths: Vec<f32> = (1..=pages).map(|n| (base + n) as f32).collect();
    create_sized_pdf(&widths)
}

fn widths(bytes: &[u8]) -> Vec<i64> {
    page_widths(bytes)
        .into_iter()
        .map(|w| w.round() as i64)
        .collect()
}

fn list_with(files: Vec<IncomingFile>) -> MergeList {
    let mut list = MergeList::new();
    let report = list.ingest(files, IntakeMode::Replace);
    assert!(report.rejected.is_empty());
    list
}

#[test]
fn edit_and_assemble() {
    let mut list = list_with(vec![
        IncomingFile::new("a.pdf", Some("application/pdf"), numbered_pdf(100, 4)),
        IncomingFile::new("b.pdf", None, numbered_pdf(200, 3)),
    ]);
    list.push_blank();

    // a: pages 2-4 reversed, then b, then a blank
    list.set_range(0, Some("2-4")).unwrap();
    list.toggle_reverse(0).unwrap();

    let bytes = assemble(&list, &AssembleOptions::default()).unwrap();
    assert_eq!(widths(&bytes), vec![104, 103, 102, 201, 202, 203, 203]);

    // Move the blank to the front: it now falls back to A4
    assert!(list.move_item(2, 0).unwrap());
    let (bytes, report) = assemble_with_report(&list, &AssembleOptions::default()).unwrap();
    assert_eq!(widths(&bytes), vec![595, 104, 103, 102, 201, 202, 203]);
    assert_eq!(report.blank_pages, 1);
    assert_eq!(list.summary().total_pages, 7);
}

#[test]
fn split_preserves_page_sequence() {
    let mut list = list_with(vec![IncomingFile::new(
        "a.pdf",
        None,
        numbered_pdf(100, 6),
    )]);
    list.set_range(0, Some("1-5")).unwrap();
    list.toggle_reverse(0).unwrap();

    let before = assemble(&list, &AssembleOptions::default()).unwrap();
    assert_eq!(widths(&before), vec![105, 104, 103, 102, 101]);

    list.split(0, 2).unwrap();
    assert_eq!(list.len(), 2);

    // Children are stored ascending; reversal is not carried over
    let after = assemble(&list, &AssembleOptions::default()).unwrap();
    assert_eq!(widths(&after), vec![104, 105, 101, 102, 103]);
}

#[test]
fn reverse_whole_list() {
    let mut list = list_with(vec![
        IncomingFile::new("a.pdf", None, numbered_pdf(100, 1)),
        IncomingFile::new("b.pdf", None, numbered_pdf(200, 1)),
        IncomingFile::new("c.pdf", None, numbered_pdf(300, 1)),
    ]);
    list.reverse_all().unwrap();

    let bytes = assemble(&list, &AssembleOptions::default()).unwrap();
    assert_eq!(widths(&bytes), vec![301, 201, 101]);
}

#[test]
fn rejected_files_do_not_enter_the_list() {
    let mut list = MergeList::new();
    let report = list.ingest(
        vec![
            IncomingFile::new("ok.pdf", None, numbered_pdf(100, 2)),
            IncomingFile::new("bad.pdf", None, b"%PDF-1.4 truncated".to_vec()),
        ],
        IntakeMode::Append,
    );

    assert_eq!(report.accepted(), 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(list.len(), 1);
    assert!(matches!(list.get(0), Some(Item::File(_))));
}

#[test]
fn empty_list_reports_no_op() {
    let list = MergeList::new();
    let err = assemble(&list, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(err, MergeError::EmptyOperation(_)));
}
