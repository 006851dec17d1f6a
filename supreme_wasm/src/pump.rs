// Timer pump: maps the storefront's virtual clock onto setTimeout
use crate::page;
use log::{error, warn};
use std::cell::RefCell;
use std::rc::Rc;
use supreme_core::search::results_title;
use supreme_core::wasm::LocalStorageBackend;
use supreme_core::{elapsed_whole_millis, CoreError, Storefront, StorefrontEvent};
use wasm_bindgen::JsValue;

pub(crate) struct Shared {
    pub storefront: Storefront<LocalStorageBackend>,
    /// `Date.now()` of the last clock sync
    last_tick: f64,
    /// Bumped on every re-arm; a sleeping timer with an older value is stale
    generation: u64,
    listener: Option<js_sys::Function>,
}

pub(crate) type Handle = Rc<RefCell<Shared>>;

impl Shared {
    pub fn new(storefront: Storefront<LocalStorageBackend>) -> Self {
        Self {
            storefront,
            last_tick: js_sys::Date::now(),
            generation: 0,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: Option<js_sys::Function>) {
        self.listener = listener;
    }

    /// Stop the pump; any sleeping timer wakes up stale
    pub fn halt(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

pub(crate) fn to_js(err: CoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Advance the storefront by the wall-clock time since the last sync
pub(crate) fn catch_up(shared: &Handle) -> Vec<StorefrontEvent> {
    let mut s = shared.borrow_mut();
    let (elapsed, next_tick) = elapsed_whole_millis(s.last_tick, js_sys::Date::now());
    s.last_tick = next_tick;
    s.storefront.advance(elapsed)
}

/// React to clock events, then forward them to the page listener. No borrow
/// is held while the listener runs, so it may call back into the store.
pub(crate) fn dispatch(shared: &Handle, events: Vec<StorefrontEvent>) {
    if events.is_empty() {
        return;
    }
    for event in &events {
        if let StorefrontEvent::ResultsDelivered { query, .. } = event {
            if let Err(e) = show_results(shared, query) {
                error!("Failed to show results for {:?}: {:?}", query, e);
            }
        }
    }

    let listener = shared.borrow().listener.clone();
    let Some(listener) = listener else {
        return;
    };
    for event in events {
        let value = match serde_wasm_bindgen::to_value(&event) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to convert event {:?}: {}", event, e);
                continue;
            }
        };
        if let Err(e) = listener.call1(&JsValue::NULL, &value) {
            warn!("Event listener threw: {:?}", e);
        }
    }
}

/// Render in place on the results page, otherwise navigate to it
fn show_results(shared: &Handle, query: &str) -> Result<(), JsValue> {
    let s = shared.borrow();
    let storefront = &s.storefront;
    if !page::is_results_page(storefront.search().results_page()) {
        let url = storefront.search().results_url(query);
        drop(s);
        return page::navigate(&url);
    }
    let html = match storefront.last_results() {
        Some((q, products)) => storefront.render_search_page(q, products).map_err(to_js)?,
        None => return Ok(()),
    };
    page::show_results_in_place(&results_title(query), &html)
}

/// Schedule a wake-up for the earliest pending storefront timer
pub(crate) fn arm(shared: &Handle) {
    let (due, generation) = {
        let mut s = shared.borrow_mut();
        s.generation = s.generation.wrapping_add(1);
        (s.storefront.next_due_in(), s.generation)
    };
    let Some(due) = due else {
        return;
    };

    let shared = shared.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let ms = due.as_millis().min(i32::MAX as u128) as i32;
        if let Err(e) = sleep_ms(ms).await {
            error!("Timer failed: {:?}", e);
            return;
        }
        if shared.borrow().generation != generation {
            return;
        }
        let events = catch_up(&shared);
        dispatch(&shared, events);
        arm(&shared);
    });
}

/// Resolve after `ms` milliseconds (immediately when there is no window)
pub async fn sleep_ms(ms: i32) -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .map(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms));
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.map(|_| ())
}
