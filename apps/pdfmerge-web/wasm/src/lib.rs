//! WASM bindings for the PDF merge tool
//!
//! All list state lives in Rust inside `MergeSession`. JavaScript only reads
//! files, forwards clicks and drags, and renders what the session reports.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { MergeSession, loadTheme } from './pkg/pdfmerge_wasm.js';
//!
//! await init();
//!
//! const session = new MergeSession();
//! const files = await Promise.all([...input.files].map(async (f) => ({
//!   name: f.name,
//!   type: f.type,
//!   bytes: new Uint8Array(await f.arrayBuffer()),
//! })));
//! session.addFiles(files, false);   // picker replaces, drop appends
//! session.addBlank();
//! session.setRange(0, "1-3, 5");
//! session.moveItem(2, 0);
//! session.download(outputNameInput.value);
//! statusEl.textContent = session.statusMessage;
//! ```

pub mod preview;
pub mod session;
pub mod theme;
pub mod validation;

use wasm_bindgen::prelude::*;

pub use session::MergeSession;
pub use theme::Theme;
pub use validation::PdfInfo;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get PDF info without adding it to a session
#[wasm_bindgen(js_name = getPdfInfo)]
pub fn get_pdf_info(name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info =
        validation::validate_pdf(name, bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Format bytes as human-readable string
#[wasm_bindgen(js_name = formatBytes)]
pub fn format_bytes(bytes: usize) -> String {
    pdfmerge_core::format_bytes(bytes)
}

/// Placeholder for the output name field, based on today's date
#[wasm_bindgen(js_name = defaultOutputName)]
pub fn default_output_name() -> String {
    pdfmerge_core::default_output_name(chrono::Local::now().date_naive())
}

/// Canonical form of a range expression, or `undefined` if it selects nothing
#[wasm_bindgen(js_name = normalizeRange)]
pub fn normalize_range(input: &str, page_count: usize) -> Option<String> {
    pdfmerge_core::PageRange::parse(input, page_count)
        .map(|range| pdfmerge_core::format_page_ranges(&range.indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize_range("5, 1-3, 2", 10).as_deref(), Some("1-3,5"));
        assert_eq!(normalize_range("abc", 10), None);
    }
}
