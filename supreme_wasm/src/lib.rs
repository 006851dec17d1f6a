// Supreme Nutrition WASM Bindings
// Browser storefront over the shared core; localStorage persistence
#![cfg(target_arch = "wasm32")]

use log::info;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use supreme_core::search::{query_from_location, results_title, SearchOutcome};
use supreme_core::ui::navigation;
use supreme_core::ui::Counter;
use supreme_core::validation::FormResult;
use supreme_core::wasm::{system_prefers_dark, viewport_width, LocalStorageBackend};
use supreme_core::{
    Catalog, Category, ExecuteStatus, FavoriteChange, LoginForm, RegisterForm, Settings, Storefront,
    SubmitStatus, Theme,
};
use wasm_bindgen::prelude::*;

mod page;
mod pump;

use pump::{to_js, Handle, Shared};

// Initialize panic hook and logger for WASM
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Result of a form submission as seen by the page
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitReply {
    pending: bool,
    message: Option<&'static str>,
    fields: Option<FormResult>,
}

impl From<SubmitStatus> for SubmitReply {
    fn from(status: SubmitStatus) -> Self {
        match status {
            SubmitStatus::Pending(_) => Self {
                pending: true,
                message: None,
                fields: None,
            },
            SubmitStatus::Rejected { message, fields } => Self {
                pending: false,
                message: Some(message),
                fields,
            },
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to convert value: {}", e)))
}

fn parse_category(name: Option<String>) -> Result<Option<Category>, JsValue> {
    match name {
        None => Ok(None),
        Some(name) => Category::parse(&name)
            .map(Some)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown category: {}", name))),
    }
}

/// The storefront as one page-lifetime object
#[wasm_bindgen]
pub struct SupremeStore {
    shared: Handle,
}

#[wasm_bindgen]
impl SupremeStore {
    /// Build the storefront. `settings_toml` overrides the default timings.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_toml: Option<String>) -> Result<SupremeStore, JsValue> {
        let settings = match settings_toml {
            Some(text) => Settings::from_toml_str(&text).map_err(to_js)?,
            None => Settings::default(),
        };
        let store = Arc::new(LocalStorageBackend::new(settings.storage_prefix.clone()));
        let mut storefront = Storefront::init(
            store,
            settings,
            Arc::new(Catalog::seeded()),
            system_prefers_dark(),
        )
        .map_err(to_js)?;
        storefront.set_results_sink(Box::new(page::SessionResultsSink));

        if let Err(e) = page::apply_theme(storefront.theme()) {
            log::warn!("Failed to apply theme: {:?}", e);
        }
        info!("SupremeStore ready");

        Ok(Self {
            shared: Rc::new(RefCell::new(Shared::new(storefront))),
        })
    }

    /// Sync the clock, run `f`, then re-arm the timer pump
    fn with_store<R>(&self, f: impl FnOnce(&mut Storefront<LocalStorageBackend>) -> R) -> R {
        let events = pump::catch_up(&self.shared);
        pump::dispatch(&self.shared, events);
        let result = f(&mut self.shared.borrow_mut().storefront);
        pump::arm(&self.shared);
        result
    }

    fn read<R>(&self, f: impl FnOnce(&Storefront<LocalStorageBackend>) -> R) -> R {
        f(&self.shared.borrow().storefront)
    }

    /// Receive clock events (`{type: "cartOpened"}` and friends)
    #[wasm_bindgen]
    pub fn set_listener(&self, listener: Option<js_sys::Function>) {
        self.shared.borrow_mut().set_listener(listener);
    }

    /// Process whatever timers are due right now
    #[wasm_bindgen]
    pub fn tick(&self) {
        self.with_store(|_| ());
    }

    /// Cancel all timers; persisted state is untouched
    #[wasm_bindgen]
    pub fn teardown(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.halt();
        shared.storefront.teardown();
    }

    // Catalog

    #[wasm_bindgen]
    pub fn products(&self, category: Option<String>) -> Result<JsValue, JsValue> {
        let category = parse_category(category)?;
        self.read(|sf| match category {
            Some(c) => to_value(&sf.catalog().get_by_category(c)),
            None => to_value(&sf.catalog().get_all()),
        })
    }

    #[wasm_bindgen]
    pub fn product(&self, id: &str) -> Result<JsValue, JsValue> {
        self.read(|sf| to_value(&sf.catalog().get_by_id(id)))
    }

    #[wasm_bindgen]
    pub fn render_products(&self, category: Option<String>) -> Result<String, JsValue> {
        let category = parse_category(category)?;
        self.read(|sf| sf.render_products(category)).map_err(to_js)
    }

    // Cart

    #[wasm_bindgen]
    pub fn add_to_cart(&self, id: &str) -> Result<u32, JsValue> {
        self.with_store(|sf| sf.add_to_cart(id)).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn remove_from_cart(&self, id: &str) -> bool {
        self.with_store(|sf| sf.remove_from_cart(id))
    }

    #[wasm_bindgen]
    pub fn set_quantity(&self, id: &str, qty: i32) -> bool {
        self.with_store(|sf| sf.set_quantity(id, i64::from(qty)))
    }

    #[wasm_bindgen]
    pub fn increment(&self, id: &str) -> bool {
        self.with_store(|sf| sf.increment(id))
    }

    #[wasm_bindgen]
    pub fn decrement(&self, id: &str) -> bool {
        self.with_store(|sf| sf.decrement(id))
    }

    #[wasm_bindgen]
    pub fn clear_cart(&self) {
        self.with_store(|sf| sf.clear_cart());
    }

    #[wasm_bindgen]
    pub fn toggle_cart(&self) -> bool {
        self.with_store(|sf| sf.toggle_cart())
    }

    #[wasm_bindgen]
    pub fn open_cart(&self) {
        self.with_store(|sf| sf.open_cart());
    }

    #[wasm_bindgen]
    pub fn close_cart(&self) {
        self.with_store(|sf| sf.close_cart());
    }

    #[wasm_bindgen]
    pub fn render_cart(&self) -> Result<String, JsValue> {
        self.read(|sf| sf.render_cart()).map_err(to_js)
    }

    // Favorites

    /// Returns whether the product is now a favorite
    #[wasm_bindgen]
    pub fn toggle_favorite(&self, id: &str) -> Result<bool, JsValue> {
        let change = self.with_store(|sf| sf.toggle_favorite(id)).map_err(to_js)?;
        Ok(change == FavoriteChange::Added)
    }

    #[wasm_bindgen]
    pub fn show_favorites_summary(&self) {
        self.with_store(|sf| sf.show_favorites_summary());
    }

    #[wasm_bindgen]
    pub fn clear_favorites(&self) {
        self.with_store(|sf| sf.clear_favorites());
    }

    // Theme

    #[wasm_bindgen]
    pub fn theme(&self) -> String {
        self.read(|sf| sf.theme().as_str().to_string())
    }

    #[wasm_bindgen]
    pub fn toggle_theme(&self) -> Result<String, JsValue> {
        let theme = self.with_store(|sf| sf.toggle_theme());
        page::apply_theme(theme)?;
        Ok(theme.as_str().to_string())
    }

    #[wasm_bindgen]
    pub fn set_theme(&self, name: &str) -> Result<String, JsValue> {
        let theme = Theme::parse(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown theme: {}", name)))?;
        let theme = self.with_store(|sf| sf.set_theme(theme));
        page::apply_theme(theme)?;
        Ok(theme.as_str().to_string())
    }

    /// Forward a `prefers-color-scheme` change
    #[wasm_bindgen]
    pub fn on_system_theme_change(&self, prefers_dark: bool) -> Result<String, JsValue> {
        let theme = self.with_store(|sf| sf.on_system_theme_change(prefers_dark));
        page::apply_theme(theme)?;
        Ok(theme.as_str().to_string())
    }

    // Search

    #[wasm_bindgen]
    pub fn suggestions(&self, query: &str) -> Result<JsValue, JsValue> {
        self.read(|sf| to_value(&sf.search().suggest(query)))
    }

    #[wasm_bindgen]
    pub fn search_input(&self, value: &str) {
        self.with_store(|sf| sf.search_input(value));
    }

    #[wasm_bindgen]
    pub fn search_focus(&self) {
        self.with_store(|sf| sf.search_focus());
    }

    /// Submit the header form; false when the query was too short
    #[wasm_bindgen]
    pub fn submit_search(&self) -> bool {
        let status = self.with_store(|sf| sf.submit_search());
        matches!(status, ExecuteStatus::Pending(_))
    }

    #[wasm_bindgen]
    pub fn execute_search(&self, query: &str) -> bool {
        let status = self.with_store(|sf| sf.execute_search(query));
        matches!(status, ExecuteStatus::Pending(_))
    }

    #[wasm_bindgen]
    pub fn select_suggestion(&self, id: &str) -> Result<bool, JsValue> {
        let status = self.with_store(|sf| sf.select_suggestion(id)).map_err(to_js)?;
        Ok(matches!(status, ExecuteStatus::Pending(_)))
    }

    /// Dropdown markup, or undefined while the panel is hidden
    #[wasm_bindgen]
    pub fn render_search_panel(&self) -> Result<Option<String>, JsValue> {
        self.read(|sf| sf.render_search_panel()).map_err(to_js)
    }

    /// On the results page: render the `?q=` query straight away, without
    /// the simulated latency. Returns false when the URL carries no query.
    #[wasm_bindgen]
    pub fn render_results_from_location(&self) -> Result<bool, JsValue> {
        let Some(query) = query_from_location(&page::location_search()?) else {
            return Ok(false);
        };
        let html = self.read(|sf| match sf.search().execute_now(&query) {
            Ok(SearchOutcome::Results { query, products }) => {
                sf.render_search_page(&query, &products).map(Some)
            }
            Ok(SearchOutcome::Empty { query, .. }) => sf.render_search_page(&query, &[]).map(Some),
            Err(_) => Ok(None),
        });
        match html.map_err(to_js)? {
            Some(html) => {
                page::show_results_in_place(&results_title(&query), &html)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // Modals and auth

    #[wasm_bindgen]
    pub fn open_modal(&self, id: &str) -> bool {
        self.with_store(|sf| sf.open_modal(id))
    }

    #[wasm_bindgen]
    pub fn close_modal(&self, id: &str) -> bool {
        self.with_store(|sf| sf.close_modal(id))
    }

    #[wasm_bindgen]
    pub fn on_escape(&self) {
        self.with_store(|sf| sf.on_escape());
    }

    #[wasm_bindgen]
    pub fn submit_login(&self, email: String, password: String) -> Result<JsValue, JsValue> {
        let form = LoginForm { email, password };
        let status = self.with_store(|sf| sf.submit_login(&form));
        to_value(&SubmitReply::from(status))
    }

    /// `form` is `{firstname, lastname, email, phone, password, confirmPassword}`
    #[wasm_bindgen]
    pub fn submit_register(&self, form: JsValue) -> Result<JsValue, JsValue> {
        let form: RegisterForm = serde_wasm_bindgen::from_value(form)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse form: {}", e)))?;
        let status = self.with_store(|sf| sf.submit_register(&form));
        to_value(&SubmitReply::from(status))
    }

    /// Blur-time validation of the register form
    #[wasm_bindgen]
    pub fn validate_register(&self, form: JsValue) -> Result<JsValue, JsValue> {
        let form: RegisterForm = serde_wasm_bindgen::from_value(form)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse form: {}", e)))?;
        to_value(&form.validate())
    }

    // Page effects

    #[wasm_bindgen]
    pub fn on_scroll(&self, scroll_top: f64, scroll_height: f64, viewport_height: f64) -> Result<JsValue, JsValue> {
        self.read(|sf| to_value(&sf.on_scroll(scroll_top, scroll_height, viewport_height)))
    }

    #[wasm_bindgen]
    pub fn on_document_click(&self) {
        self.with_store(|sf| sf.on_document_click());
    }

    #[wasm_bindgen]
    pub fn toggle_nav(&self) -> bool {
        self.with_store(|sf| sf.navigation_mut().toggle())
    }

    #[wasm_bindgen]
    pub fn on_nav_link_click(&self) {
        let width = viewport_width().unwrap_or(u32::MAX);
        self.with_store(|sf| sf.navigation_mut().on_link_click(width));
    }

    #[wasm_bindgen]
    pub fn on_resize(&self) {
        if let Some(width) = viewport_width() {
            self.with_store(|sf| sf.navigation_mut().on_resize(width));
        }
    }

    #[wasm_bindgen]
    pub fn toggle_mobile_search(&self) -> bool {
        self.with_store(|sf| sf.mobile_search_mut().toggle())
    }

    #[wasm_bindgen]
    pub fn view_state(&self) -> Result<JsValue, JsValue> {
        self.read(|sf| to_value(&sf.view_state()))
    }
}

/// Index of the nav link matching the current path, or -1
#[wasm_bindgen]
pub fn active_nav_link(current_path: &str, links: Vec<String>) -> i32 {
    let links: Vec<&str> = links.iter().map(String::as_str).collect();
    navigation::active_link(current_path, &links)
        .map(|i| i as i32)
        .unwrap_or(-1)
}

/// `1500` -> `"2k+"`
#[wasm_bindgen]
pub fn format_count(n: f64) -> String {
    supreme_core::ui::format_count(n.max(0.0) as u64)
}

/// Stats counter animated by the page's frame loop
#[wasm_bindgen]
pub struct StatCounter {
    inner: Counter,
}

#[wasm_bindgen]
impl StatCounter {
    #[wasm_bindgen(constructor)]
    pub fn new(target: f64) -> StatCounter {
        Self {
            inner: Counter::new(target.max(0.0) as u64, &Settings::default()),
        }
    }

    /// Advance by `elapsed_ms` and return the text to show
    #[wasm_bindgen]
    pub fn advance(&mut self, elapsed_ms: f64) -> String {
        self.inner
            .advance(std::time::Duration::from_millis(elapsed_ms.max(0.0) as u64));
        self.inner.display()
    }

    #[wasm_bindgen]
    pub fn is_done(&self) -> bool {
        self.inner.is_done()
    }
}
