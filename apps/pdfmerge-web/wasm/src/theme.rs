//! Light/dark theme preference, the only state kept between visits

use wasm_bindgen::prelude::*;

/// localStorage key holding `"light"` or `"dark"`
pub const THEME_STORAGE_KEY: &str = "pdfToolTheme";

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Anything other than `"light"` (including nothing stored) means dark
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

fn storage() -> Result<web_sys::Storage, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    Ok(window.local_storage()?.ok_or("No localStorage")?)
}

/// Read the saved theme
#[wasm_bindgen(js_name = loadTheme)]
pub fn load_theme() -> Result<Theme, JsValue> {
    let stored = storage()?.get_item(THEME_STORAGE_KEY)?;
    Ok(Theme::from_stored(stored.as_deref()))
}

#[wasm_bindgen(js_name = saveTheme)]
pub fn save_theme(theme: Theme) -> Result<(), JsValue> {
    storage()?.set_item(THEME_STORAGE_KEY, theme.as_str())
}

/// Switch to the other theme, persist it, and return it
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> Result<Theme, JsValue> {
    let next = load_theme()?.toggled();
    save_theme(next)?;
    Ok(next)
}

/// Name of the theme, for use as a CSS class
#[wasm_bindgen(js_name = themeName)]
pub fn theme_name(theme: Theme) -> String {
    theme.as_str().to_string()
}
