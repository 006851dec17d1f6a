// Browser page glue: result hand-off, navigation, theme attribute

use log::{debug, warn};
use supreme_core::{Product, ResultsSink, Theme};
use wasm_bindgen::JsValue;

const QUERY_KEY: &str = "searchQuery";
const RESULTS_KEY: &str = "searchResults";
const RESULTS_CONTAINER: &str = ".search-page-results";

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))
}

fn document() -> Result<web_sys::Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))
}

/// Writes every delivered result set to sessionStorage so the results page
/// can pick it up after a navigation
pub struct SessionResultsSink;

impl ResultsSink for SessionResultsSink {
    fn deliver(&mut self, query: &str, results: &[Product]) {
        if let Err(e) = store_results(query, results) {
            warn!("Failed to store search results: {:?}", e);
        }
    }
}

fn store_results(query: &str, results: &[Product]) -> Result<(), JsValue> {
    let storage = window()?
        .session_storage()?
        .ok_or_else(|| JsValue::from_str("sessionStorage not available"))?;
    let json = serde_json::to_string(results)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize results: {}", e)))?;
    storage.set_item(QUERY_KEY, query)?;
    storage.set_item(RESULTS_KEY, &json)?;
    debug!("Stored {} results for {:?}", results.len(), query);
    Ok(())
}

/// `?q=...` part of the current URL
pub fn location_search() -> Result<String, JsValue> {
    window()?.location().search()
}

/// Whether the current document is the results page (matched on its file name)
pub fn is_results_page(results_page: &str) -> bool {
    let file = results_page.rsplit('/').next().unwrap_or(results_page);
    match window().and_then(|w| w.location().pathname()) {
        Ok(path) => path.contains(file),
        Err(_) => false,
    }
}

pub fn navigate(url: &str) -> Result<(), JsValue> {
    debug!("Navigating to {}", url);
    window()?.location().set_href(url)
}

/// Replace the results container and the document title. Pages without the
/// container only get the title.
pub fn show_results_in_place(title: &str, html: &str) -> Result<(), JsValue> {
    let document = document()?;
    document.set_title(title);
    if let Some(container) = document.query_selector(RESULTS_CONTAINER)? {
        container.set_inner_html(html);
    }
    Ok(())
}

/// Reflect the theme on `<html data-theme="...">`
pub fn apply_theme(theme: Theme) -> Result<(), JsValue> {
    if let Some(root) = document()?.document_element() {
        root.set_attribute("data-theme", theme.as_str())?;
    }
    Ok(())
}
