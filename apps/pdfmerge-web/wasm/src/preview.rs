//! Object URLs handed to the browser
//!
//! Each preview holds a blob URL that keeps the merged bytes alive. Only the
//! latest one is kept; the previous URL is revoked before a new one is
//! stored.

use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Holds at most one live preview URL
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<String>,
}

impl PreviewSlot {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Store `url` and hand back the one it supersedes, which must be released
    pub fn replace(&mut self, url: String) -> Option<String> {
        self.current.replace(url)
    }

    pub fn take(&mut self) -> Option<String> {
        self.current.take()
    }
}

/// Wrap PDF bytes in a blob URL
pub fn pdf_object_url(bytes: &[u8]) -> Result<String, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);

    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

pub fn revoke(url: &str) -> Result<(), JsValue> {
    Url::revoke_object_url(url)
}
