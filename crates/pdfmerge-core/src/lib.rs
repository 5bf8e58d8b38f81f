//! PDF merge list and assembly
//!
//! This crate holds the client-side logic behind the merge tool:
//! - `range`: the `"1-3,5,7-9"` page selection grammar
//! - `list`: the ordered list of files and blank pages the user edits
//! - `assemble`: folds the list into one PDF using lopdf
//!
//! Nothing here touches the DOM; the wasm and CLI front ends drive it.

pub mod assemble;
pub mod codec;
pub mod error;
pub mod intake;
pub mod item;
pub mod list;
pub mod output;
pub mod range;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use assemble::{assemble, assemble_with_report, AssembleOptions, AssemblyReport};
pub use codec::{OutputDocument, PageSize, SourceDocument};
pub use error::MergeError;
pub use intake::{IncomingFile, IntakeReport};
pub use item::{FileItem, Item, ItemKind, ItemView, SourceFile};
pub use list::{IntakeMode, MergeList, Summary};
pub use output::{default_output_name, format_bytes, resolve_output_name};
pub use range::{format_page_ranges, parse_page_indices, PageRange};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, MergeError> {
    Ok(SourceDocument::load("document", bytes)?.page_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_pdf;

    #[test]
    fn test_get_page_count() {
        assert_eq!(get_page_count(&create_test_pdf(7)).unwrap(), 7);
        assert!(get_page_count(b"not a pdf").is_err());
    }

    #[test]
    fn test_parse_then_format_roundtrip() {
        let range = PageRange::parse("1-3, 5, 8-10", 10).unwrap();
        assert_eq!(range.indices, vec![0, 1, 2, 4, 7, 8, 9]);
        assert_eq!(format_page_ranges(&range.indices), "1-3,5,8-10");
    }
}
