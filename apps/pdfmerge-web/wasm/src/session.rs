//! Stateful merge session
//!
//! Holds the merge list in Rust memory. JavaScript reads files, forwards
//! user actions, and re-renders from `getItems()` / `getSummary()` and the
//! status line after every call.

use crate::preview::{self, PreviewSlot};
use js_sys::{Reflect, Uint8Array};
use pdfmerge_core::{
    assemble_with_report, resolve_output_name, AssembleOptions, IncomingFile, IntakeMode,
    IntakeReport, MergeError, MergeList, PageSize,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Loading,
    Error,
}

impl StatusLevel {
    fn as_str(self) -> &'static str {
        match self {
            StatusLevel::Info => "info",
            StatusLevel::Loading => "loading",
            StatusLevel::Error => "error",
        }
    }
}

/// Merge list plus the UI state that goes with it
#[wasm_bindgen]
pub struct MergeSession {
    list: MergeList,
    options: AssembleOptions,
    status: String,
    status_level: StatusLevel,
    /// Set while an assembly runs; a second request is refused
    busy: bool,
    preview: PreviewSlot,
}

impl Default for MergeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MergeSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            list: MergeList::new(),
            options: AssembleOptions::default(),
            status: "Choose PDF files to merge.".to_string(),
            status_level: StatusLevel::Info,
            busy: false,
            preview: PreviewSlot::default(),
        }
    }

    #[wasm_bindgen(getter, js_name = statusMessage)]
    pub fn status_message(&self) -> String {
        self.status.clone()
    }

    /// One of `"info"`, `"loading"`, `"error"`
    #[wasm_bindgen(getter, js_name = statusLevel)]
    pub fn status_level(&self) -> String {
        self.status_level.as_str().to_string()
    }

    /// Size used for a blank page placed before any other page
    #[wasm_bindgen(js_name = setBlankPageSize)]
    pub fn set_blank_page_size(&mut self, width: f32, height: f32) {
        self.options.blank_page_size = PageSize::new(width, height);
    }

    /// Add files read by JavaScript.
    ///
    /// `files` is an array of `{ name, type, bytes: Uint8Array }`. With
    /// `append` false the loadable files replace the current list.
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&mut self, files: js_sys::Array, append: bool) -> Result<JsValue, JsValue> {
        let incoming = files
            .iter()
            .map(|entry| incoming_from_js(&entry))
            .collect::<Result<Vec<_>, _>>()?;

        let mode = if append {
            IntakeMode::Append
        } else {
            IntakeMode::Replace
        };
        let report = self.ingest_internal(incoming, mode);

        let result = IntakeResultJs {
            accepted: report.accepted(),
            rejected: report.rejected.iter().map(|e| e.to_string()).collect(),
            skipped: report.skipped,
        };
        to_js_value(&result)
    }

    #[wasm_bindgen(js_name = addBlank)]
    pub fn add_blank(&mut self) {
        self.list.push_blank();
        self.set_status("Added a blank page. Drag it where you need it.");
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.set_status("List cleared. Choose new PDF files.");
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&mut self, index: usize) -> Result<(), JsValue> {
        let result = self.list.remove(index).map(|_| ());
        self.report(result, |_| "Removed the item.".to_string())
            .map_err(to_js_error)
    }

    /// Drop the item at `from` before position `to` (`to` may be the length)
    #[wasm_bindgen(js_name = moveItem)]
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool, JsValue> {
        self.list.move_item(from, to).map_err(|e| {
            self.set_error(&e);
            to_js_error(e)
        })
    }

    /// Reverse the whole list. Returns false when the list was empty.
    #[wasm_bindgen(js_name = reverseAll)]
    pub fn reverse_all(&mut self) -> bool {
        let result = self.list.reverse_all();
        self.report(result, |_| "Reversed the list order.".to_string())
            .is_ok()
    }

    /// Set the page range of a file item; empty or missing text clears it
    #[wasm_bindgen(js_name = setRange)]
    pub fn set_range(&mut self, index: usize, text: Option<String>) -> Result<(), JsValue> {
        self.set_range_internal(index, text.as_deref())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = toggleReverse)]
    pub fn toggle_reverse(&mut self, index: usize) -> Result<bool, JsValue> {
        self.list.toggle_reverse(index).map_err(|e| {
            self.set_error(&e);
            to_js_error(e)
        })
    }

    /// Split a file item after `split_after` pages of its current selection
    pub fn split(&mut self, index: usize, split_after: usize) -> Result<(), JsValue> {
        let result = self.list.split(index, split_after);
        self.report(result, |_| "Split the item in two.".to_string())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getItems)]
    pub fn get_items(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.list.views())
    }

    #[wasm_bindgen(js_name = getSummary)]
    pub fn get_summary(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.list.summary())
    }

    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> usize {
        self.list.len()
    }

    /// Assemble the list and return the PDF bytes
    pub fn merge(&mut self) -> Result<Uint8Array, JsValue> {
        let bytes = self.merge_internal().map_err(to_js_error)?;
        Ok(Uint8Array::from(bytes.as_slice()))
    }

    /// Assemble the list and start a browser download.
    ///
    /// Returns the file name used.
    pub fn download(&mut self, name: &str) -> Result<String, JsValue> {
        let bytes = self.merge_internal().map_err(to_js_error)?;
        let file_name = resolve_output_name(name, chrono::Local::now().date_naive());

        let url = preview::pdf_object_url(&bytes)?;
        let clicked = trigger_download(&url, &file_name);
        preview::revoke(&url)?;
        clicked?;

        self.set_status(&format!("Merge complete! Downloaded {}.", file_name));
        Ok(file_name)
    }

    /// Assemble the list and open it in a new tab.
    ///
    /// The previous preview URL is released first. Returns the new URL.
    pub fn preview(&mut self) -> Result<String, JsValue> {
        let bytes = self.merge_internal().map_err(to_js_error)?;

        let url = preview::pdf_object_url(&bytes)?;
        if let Some(previous) = self.preview.replace(url.clone()) {
            preview::revoke(&previous)?;
        }

        let window = web_sys::window().ok_or("No window")?;
        window.open_with_url_and_target(&url, "_blank")?;

        self.set_status("Preview opened in a new tab.");
        Ok(url)
    }

    /// Release the current preview URL, if any
    #[wasm_bindgen(js_name = clearPreview)]
    pub fn clear_preview(&mut self) -> Result<(), JsValue> {
        if let Some(url) = self.preview.take() {
            preview::revoke(&url)?;
        }
        Ok(())
    }
}

impl MergeSession {
    pub(crate) fn ingest_internal(
        &mut self,
        files: Vec<IncomingFile>,
        mode: IntakeMode,
    ) -> IntakeReport {
        let report = self.list.ingest(files, mode);

        if report.candidates == 0 {
            self.set_status("No PDF files in the selection.");
        } else if report.rejected.is_empty() {
            self.set_status(&format!(
                "Added {} file(s). Drag to reorder, then merge.",
                report.accepted()
            ));
        } else {
            let failures: Vec<String> = report.rejected.iter().map(|e| e.to_string()).collect();
            self.status_level = StatusLevel::Error;
            self.status = format!(
                "Added {} file(s). {}",
                report.accepted(),
                failures.join("; ")
            );
            log_status(&self.status);
        }
        report
    }

    pub(crate) fn set_range_internal(
        &mut self,
        index: usize,
        text: Option<&str>,
    ) -> Result<(), MergeError> {
        let result = self.list.set_range(index, text);
        let range = self
            .list
            .get(index)
            .and_then(|item| item.as_file())
            .and_then(|file| file.page_range.as_ref())
            .map(|range| range.raw.clone());

        self.report(result, |_| match range {
            Some(raw) => format!("Page range set to \"{}\".", raw),
            None => "Page range cleared; all pages will be included.".to_string(),
        })
    }

    pub(crate) fn merge_internal(&mut self) -> Result<Vec<u8>, MergeError> {
        if self.busy {
            return Err(MergeError::Busy);
        }
        if self.list.is_empty() {
            let e = MergeError::EmptyOperation("add PDFs or blank pages first");
            self.set_error(&e);
            return Err(e);
        }

        self.status_level = StatusLevel::Loading;
        self.status = "Merging PDFs...".to_string();

        self.busy = true;
        let result = assemble_with_report(&self.list, &self.options);
        self.busy = false;

        match result {
            Ok((bytes, report)) => {
                self.set_status(&format!(
                    "Merged {} pages ({}).",
                    report.pages,
                    pdfmerge_core::format_bytes(report.output_size_bytes)
                ));
                Ok(bytes)
            }
            Err(e) => {
                self.set_error(&e);
                Err(e)
            }
        }
    }

    fn report<T>(
        &mut self,
        result: Result<T, MergeError>,
        message: impl FnOnce(&T) -> String,
    ) -> Result<T, MergeError> {
        match &result {
            Ok(value) => {
                let text = message(value);
                self.set_status(&text);
            }
            Err(e) => self.set_error(e),
        }
        result
    }

    fn set_status(&mut self, message: &str) {
        self.status_level = StatusLevel::Info;
        self.status = message.to_string();
        log_status(message);
    }

    /// No-op outcomes read as information, everything else as an error
    fn set_error(&mut self, error: &MergeError) {
        self.status_level = if error.is_no_op() {
            StatusLevel::Info
        } else {
            StatusLevel::Error
        };
        self.status = error.to_string();
        log_status(&self.status);
    }
}

/// Result of `addFiles` for JS
#[derive(Serialize)]
struct IntakeResultJs {
    accepted: usize,
    rejected: Vec<String>,
    skipped: Vec<String>,
}

fn incoming_from_js(entry: &JsValue) -> Result<IncomingFile, JsValue> {
    let name = Reflect::get(entry, &"name".into())?
        .as_string()
        .ok_or("File entry is missing a name")?;
    let mime = Reflect::get(entry, &"type".into())?.as_string();
    let bytes: Uint8Array = Reflect::get(entry, &"bytes".into())?.dyn_into()?;

    Ok(IncomingFile {
        name,
        mime,
        bytes: bytes.to_vec(),
    })
}

fn trigger_download(url: &str, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let anchor = document.create_element("a")?;
    anchor.set_attribute("href", url)?;
    anchor.set_attribute("download", file_name)?;
    anchor.dyn_into::<web_sys::HtmlElement>()?.click();
    Ok(())
}

fn to_js_error(error: MergeError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn log_status(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
