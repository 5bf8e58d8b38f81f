//! Page range grammar
//!
//! Converts user input like `"1-3, 5, 8-10"` (1-based, inclusive) into a
//! sorted set of zero-based page indices, and back.

use crate::error::MergeError;
use serde::Serialize;
use std::collections::BTreeSet;

/// A validated, non-empty page selection for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// The user's input with whitespace removed, or a generated compact form
    pub raw: String,
    /// Zero-based page indices, strictly increasing
    pub indices: Vec<usize>,
}

impl PageRange {
    /// Parse a range expression against a document with `page_count` pages.
    ///
    /// Returns `None` for blank input, for malformed input, and for input
    /// that selects no page inside the document.
    pub fn parse(input: &str, page_count: usize) -> Option<Self> {
        let raw = strip_whitespace(input);
        if raw.is_empty() {
            return None;
        }

        let indices = parse_page_indices(&raw, page_count).ok()?;
        if indices.is_empty() {
            return None;
        }

        Some(Self {
            raw,
            indices: indices.into_iter().collect(),
        })
    }

    /// Build a range from computed indices; `raw` is regenerated in compact form
    pub fn from_indices(indices: &[usize]) -> Option<Self> {
        let set: BTreeSet<usize> = indices.iter().copied().collect();
        if set.is_empty() {
            return None;
        }

        let indices: Vec<usize> = set.into_iter().collect();
        Some(Self {
            raw: format_page_ranges(&indices),
            indices,
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a range expression into zero-based indices, reporting why it failed.
///
/// A single malformed segment rejects the whole input. Pages outside
/// `1..=page_count` are dropped without error, so the result may be empty.
pub fn parse_page_indices(input: &str, page_count: usize) -> Result<BTreeSet<usize>, MergeError> {
    let cleaned = strip_whitespace(input);
    let mut indices = BTreeSet::new();

    for part in cleaned.split(',') {
        if part.is_empty() {
            continue;
        }

        let (low, high) = if let Some((start, end)) = part.split_once('-') {
            let start = parse_page_number(start, part)?;
            let end = parse_page_number(end, part)?;
            (start.min(end), start.max(end))
        } else {
            let page = parse_page_number(part, part)?;
            (page, page)
        };

        // Clamp to the document so "1-999999" stays cheap
        for page in low.max(1)..=high.min(page_count) {
            indices.insert(page - 1);
        }
    }

    Ok(indices)
}

/// Digits only; values too large for `usize` saturate and get clamped later
fn parse_page_number(text: &str, segment: &str) -> Result<usize, MergeError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MergeError::InvalidRange(format!("Invalid segment: {:?}", segment)));
    }

    Ok(text
        .bytes()
        .fold(0usize, |n, b| n.saturating_mul(10).saturating_add(usize::from(b - b'0'))))
}

/// Render zero-based indices as a compact 1-based range string.
///
/// `[0, 1, 2, 4]` becomes `"1-3,5"`.
pub fn format_page_ranges(indices: &[usize]) -> String {
    let set: BTreeSet<usize> = indices.iter().copied().collect();
    let mut parts = Vec::new();
    let mut iter = set.into_iter();

    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut end) = (first, first);
    for index in iter {
        if index == end + 1 {
            end = index;
            continue;
        }
        parts.push(format_run(start, end));
        start = index;
        end = index;
    }
    parts.push(format_run(start, end));

    parts.join(",")
}

fn format_run(start: usize, end: usize) -> String {
    if start == end {
        format!("{}", start + 1)
    } else {
        format!("{}-{}", start + 1, end + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_mixed_segments() {
        let range = PageRange::parse("1-3,5,7-9", 10).unwrap();
        assert_eq!(range.indices, vec![0, 1, 2, 4, 6, 7, 8]);
        assert_eq!(range.raw, "1-3,5,7-9");
    }

    #[test]
    fn test_parse_reversed_bounds() {
        let range = PageRange::parse("3-1", 5).unwrap();
        assert_eq!(range.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_strips_whitespace_into_raw() {
        let range = PageRange::parse(" 1 - 2 ,\t4 ", 5).unwrap();
        assert_eq!(range.raw, "1-2,4");
        assert_eq!(range.indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_parse_malformed_fails_whole_input() {
        assert_eq!(PageRange::parse("abc", 5), None);
        assert_eq!(PageRange::parse("1-abc", 5), None);
        assert_eq!(PageRange::parse("1,2,x", 5), None);
        assert_eq!(PageRange::parse("1-2-3", 5), None);
        assert_eq!(PageRange::parse("1-", 5), None);
        assert_eq!(PageRange::parse("-3", 5), None);
    }

    #[test]
    fn test_parse_out_of_range_is_none() {
        assert_eq!(PageRange::parse("99", 5), None);
        assert_eq!(PageRange::parse("0", 5), None);
    }

    #[test]
    fn test_parse_drops_out_of_range_pages() {
        let range = PageRange::parse("4-8", 5).unwrap();
        assert_eq!(range.indices, vec![3, 4]);
    }

    #[test]
    fn test_parse_blank_input_is_none() {
        assert_eq!(PageRange::parse("", 5), None);
        assert_eq!(PageRange::parse("  \n ", 5), None);
    }

    #[test]
    fn test_parse_deduplicates_and_sorts() {
        let range = PageRange::parse("5,1-3,2-4", 10).unwrap();
        assert_eq!(range.indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let range = PageRange::parse("1,,3,", 5).unwrap();
        assert_eq!(range.indices, vec![0, 2]);
    }

    #[test]
    fn test_parse_huge_upper_bound_is_clamped() {
        let range = PageRange::parse("2-4000000000", 4).unwrap();
        assert_eq!(range.indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_drops_page_numbers_wider_than_usize() {
        let range = PageRange::parse("1,99999999999999999999999", 5).unwrap();
        assert_eq!(range.indices, vec![0]);

        let range = PageRange::parse("2-99999999999999999999", 5).unwrap();
        assert_eq!(range.indices, vec![1, 2, 3, 4]);

        assert_eq!(PageRange::parse("99999999999999999999", 5), None);
    }

    #[test]
    fn test_parse_number_rejects_signs() {
        assert_eq!(PageRange::parse("+2", 5), None);
    }

    #[test]
    fn test_parse_page_indices_reports_segment() {
        let err = parse_page_indices("1,2-x", 5).unwrap_err();
        assert!(err.to_string().contains("2-x"));
    }

    #[test]
    fn test_format_groups_runs() {
        assert_eq!(format_page_ranges(&[0, 1, 2, 4]), "1-3,5");
        assert_eq!(format_page_ranges(&[6]), "7");
        assert_eq!(format_page_ranges(&[]), "");
        assert_eq!(format_page_ranges(&[4, 0, 2, 1, 1]), "1-3,5");
    }

    #[test]
    fn test_from_indices_regenerates_raw() {
        let range = PageRange::from_indices(&[5, 3, 4]).unwrap();
        assert_eq!(range.indices, vec![3, 4, 5]);
        assert_eq!(range.raw, "4-6");
        assert_eq!(PageRange::from_indices(&[]), None);
    }
}
