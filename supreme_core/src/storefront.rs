// Storefront composition root
// Builds every service once, routes user actions to them and drives their timers

use crate::auth::{Auth, AuthFlow, LoginForm, RegisterForm, SubmitStatus};
use crate::cart::{Cart, CartSummary};
use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::favorites::{FavoriteChange, Favorites};
use crate::models::{CartLineItem, Category, Product, Theme};
use crate::render::{self, CardState};
use crate::search::{ExecuteStatus, ResultsSink, Search, SearchOutcome};
use crate::settings::Settings;
use crate::storage_trait::StorageBackend;
use crate::theme::ThemeManager;
use crate::ui::cart_panel::PanelEvent;
use crate::ui::modal::{LOGIN_MODAL, REGISTER_MODAL};
use crate::ui::{
    CartPanel, MobileSearch, ModalManager, Navigation, Notifier, PanelContent, PanelVisibility,
    ScrollEffects, ScrollState, SearchBox, Toast, ToastKind, ToastSurface,
};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Something the host may need to react to after an action or a clock tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StorefrontEvent {
    CartOpened,
    CartFeedbackCleared { id: String },
    /// Results were handed to the results sink
    ResultsDelivered { query: String, count: usize },
    /// Nothing matched; the empty state is in the search panel
    NoResults { query: String },
    AuthCompleted { flow: AuthFlow },
    /// The mobile search input should take focus now
    FocusMobileSearch,
    ToastChanged,
}

/// Snapshot of everything a host renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub theme: Theme,
    pub theme_icon: &'static str,
    pub cart: CartSummary,
    pub cart_items: Vec<CartLineItem>,
    pub cart_open: bool,
    pub favorites: Vec<String>,
    pub favorites_count: usize,
    pub toast: Option<Toast>,
    pub search_input: String,
    pub search_panel: PanelVisibility,
    pub search_content: Option<PanelContent>,
    pub search_loading: bool,
    pub open_modals: Vec<String>,
    pub nav_open: bool,
    pub mobile_search_active: bool,
    pub login_loading: bool,
    pub register_loading: bool,
}

pub struct Storefront<S: StorageBackend> {
    settings: Settings,
    catalog: Arc<Catalog>,
    cart: Cart<S>,
    favorites: Favorites<S>,
    theme: ThemeManager<S>,
    search: Search,
    search_box: SearchBox,
    cart_panel: CartPanel,
    toasts: ToastSurface,
    modals: ModalManager,
    navigation: Navigation,
    mobile_search: MobileSearch,
    scroll: ScrollEffects,
    auth: Auth,
    sink: Option<Box<dyn ResultsSink>>,
    last_results: Option<(String, Vec<Product>)>,
}

impl<S: StorageBackend> Storefront<S> {
    /// Load persisted state and wire the services together
    pub fn init(
        store: Arc<S>,
        settings: Settings,
        catalog: Arc<Catalog>,
        system_prefers_dark: bool,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        if catalog.is_empty() {
            return Err(CoreError::Init("catalog is empty".to_string()));
        }

        let cart = Cart::load(store.clone());
        let favorites = Favorites::load(store.clone());
        let theme = ThemeManager::load(store, system_prefers_dark);

        let mut modals = ModalManager::new();
        modals.register(LOGIN_MODAL);
        modals.register(REGISTER_MODAL);

        info!(
            "Storefront ready: {} products, {} cart items, {} favorites, {} theme",
            catalog.len(),
            cart.get_count(),
            favorites.count(),
            theme.current()
        );

        Ok(Self {
            search: Search::new(catalog.clone(), &settings),
            search_box: SearchBox::new(&settings),
            cart_panel: CartPanel::new(&settings),
            toasts: ToastSurface::new(&settings),
            navigation: Navigation::new(&settings),
            mobile_search: MobileSearch::new(&settings),
            scroll: ScrollEffects::new(&settings),
            auth: Auth::new(&settings),
            modals,
            cart,
            favorites,
            theme,
            catalog,
            settings,
            sink: None,
            last_results: None,
        })
    }

    /// Cancel every pending timer and close transient UI. Persisted state is
    /// already on disk, so nothing else needs flushing.
    pub fn teardown(&mut self) {
        self.search.cancel();
        self.auth.cancel_all();
        self.toasts.dismiss();
        self.cart_panel.reset();
        self.search_box.reset();
        self.mobile_search.on_outside_click();
        self.modals.close_all();
        self.navigation.close();
        info!("Storefront torn down");
    }

    pub fn set_results_sink(&mut self, sink: Box<dyn ResultsSink>) {
        self.sink = Some(sink);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }

    pub fn favorites(&self) -> &Favorites<S> {
        &self.favorites
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search_box
    }

    pub fn cart_panel(&self) -> &CartPanel {
        &self.cart_panel
    }

    pub fn toasts(&self) -> &ToastSurface {
        &self.toasts
    }

    pub fn modals(&self) -> &ModalManager {
        &self.modals
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    pub fn mobile_search_mut(&mut self) -> &mut MobileSearch {
        &mut self.mobile_search
    }

    /// Last result set handed to the sink
    pub fn last_results(&self) -> Option<(&str, &[Product])> {
        self.last_results
            .as_ref()
            .map(|(q, products)| (q.as_str(), products.as_slice()))
    }

    // Cart

    pub fn add_to_cart(&mut self, id: &str) -> Result<u32, CoreError> {
        let product = self
            .catalog
            .get_by_id(id)
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))?;
        let quantity = self.cart.add_item(product);
        self.cart_panel.on_added(id);
        Ok(quantity)
    }

    pub fn remove_from_cart(&mut self, id: &str) -> bool {
        self.cart.remove_item(id)
    }

    pub fn set_quantity(&mut self, id: &str, qty: i64) -> bool {
        self.cart.set_quantity(id, qty)
    }

    pub fn increment(&mut self, id: &str) -> bool {
        self.cart.increment(id)
    }

    pub fn decrement(&mut self, id: &str) -> bool {
        self.cart.decrement(id)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn toggle_cart(&mut self) -> bool {
        self.cart_panel.toggle()
    }

    pub fn open_cart(&mut self) {
        self.cart_panel.open();
    }

    pub fn close_cart(&mut self) {
        self.cart_panel.close();
    }

    // Favorites

    pub fn toggle_favorite(&mut self, id: &str) -> Result<FavoriteChange, CoreError> {
        if self.catalog.get_by_id(id).is_none() {
            return Err(CoreError::NotFound(format!("product {}", id)));
        }
        let change = self.favorites.toggle(id);
        let kind = match change {
            FavoriteChange::Added => ToastKind::Favorite,
            FavoriteChange::Removed => ToastKind::Unfavorite,
        };
        self.toasts.show(change.message(), kind);
        Ok(change)
    }

    pub fn show_favorites_summary(&mut self) {
        let kind = if self.favorites.count() == 0 {
            ToastKind::Unfavorite
        } else {
            ToastKind::Favorite
        };
        let message = self.favorites.summary_message();
        self.toasts.show(&message, kind);
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    // Theme

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.theme.set(theme)
    }

    pub fn on_system_theme_change(&mut self, prefers_dark: bool) -> Theme {
        self.theme.on_system_change(prefers_dark)
    }

    // Search

    pub fn search_input(&mut self, value: &str) {
        self.search_box.on_input(&self.search, value);
    }

    pub fn search_focus(&mut self) {
        self.search_box.on_focus(&self.search);
    }

    pub fn search_outside_click(&mut self) {
        self.search_box.on_outside_click();
    }

    /// Form submit with the current input
    pub fn submit_search(&mut self) -> ExecuteStatus {
        let query = self.search_box.input().to_string();
        self.execute_search(&query)
    }

    pub fn execute_search(&mut self, query: &str) -> ExecuteStatus {
        let status = self.search.execute(query);
        if let ExecuteStatus::TooShort { message } = &status {
            self.search_box.show_message(message);
        }
        status
    }

    /// Clicking a suggestion searches for that product's name
    pub fn select_suggestion(&mut self, id: &str) -> Result<ExecuteStatus, CoreError> {
        let product = self
            .catalog
            .get_by_id(id)
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))?;
        let query = self.search_box.select_suggestion(product);
        Ok(self.execute_search(&query))
    }

    // Auth

    pub fn open_modal(&mut self, id: &str) -> bool {
        self.modals.open(id)
    }

    pub fn close_modal(&mut self, id: &str) -> bool {
        self.modals.close(id)
    }

    pub fn on_escape(&mut self) {
        self.modals.on_escape();
    }

    pub fn submit_login(&mut self, form: &LoginForm) -> SubmitStatus {
        let status = self.auth.submit_login(form);
        self.notify_rejection(&status);
        status
    }

    pub fn submit_register(&mut self, form: &RegisterForm) -> SubmitStatus {
        let status = self.auth.submit_register(form);
        self.notify_rejection(&status);
        status
    }

    fn notify_rejection(&mut self, status: &SubmitStatus) {
        if let SubmitStatus::Rejected { message, .. } = status {
            self.toasts.show(message, ToastKind::Error);
        }
    }

    // Page effects

    pub fn on_scroll(&self, scroll_top: f64, scroll_height: f64, viewport_height: f64) -> ScrollState {
        self.scroll.on_scroll(scroll_top, scroll_height, viewport_height)
    }

    /// A click outside the nav, cart, search and mobile search areas
    pub fn on_document_click(&mut self) {
        self.navigation.on_outside_click();
        self.cart_panel.close();
        self.search_box.on_outside_click();
        self.mobile_search.on_outside_click();
    }

    // Clock

    /// Move every component clock forward by `elapsed`. Due points are
    /// visited in order so follow-up timers start when their trigger fired.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<StorefrontEvent> {
        let mut events = Vec::new();
        let mut remaining = elapsed;
        loop {
            match self.next_due_in() {
                Some(due_in) if due_in <= remaining => {
                    remaining -= due_in;
                    self.advance_components(due_in, &mut events);
                }
                _ => {
                    self.advance_components(remaining, &mut events);
                    break;
                }
            }
        }
        events
    }

    /// Time until the earliest pending timer of any component
    pub fn next_due_in(&self) -> Option<Duration> {
        [
            self.search.next_due_in(),
            self.search_box.next_due_in(),
            self.cart_panel.next_due_in(),
            self.toasts.next_due_in(),
            self.mobile_search.next_due_in(),
            self.auth.next_due_in(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn advance_components(&mut self, step: Duration, events: &mut Vec<StorefrontEvent>) {
        // Surfaces first: search and auth completions below feed into them,
        // and their clocks must already read the current instant.
        if self.toasts.advance(step) {
            events.push(StorefrontEvent::ToastChanged);
        }
        self.search_box.advance(step);

        for event in self.cart_panel.advance(step) {
            events.push(match event {
                PanelEvent::Opened => StorefrontEvent::CartOpened,
                PanelEvent::FeedbackCleared(id) => StorefrontEvent::CartFeedbackCleared { id },
            });
        }

        if self.mobile_search.advance(step) {
            events.push(StorefrontEvent::FocusMobileSearch);
        }

        for outcome in self.search.advance(step) {
            self.handle_search_outcome(outcome, events);
        }

        for flow in self.auth.advance(step) {
            self.toasts.show(flow.success_message(), ToastKind::Success);
            self.modals.close(flow.modal());
            events.push(StorefrontEvent::AuthCompleted { flow });
            events.push(StorefrontEvent::ToastChanged);
        }
    }

    fn handle_search_outcome(&mut self, outcome: SearchOutcome, events: &mut Vec<StorefrontEvent>) {
        match outcome {
            SearchOutcome::Results { query, products } => {
                match self.sink.as_mut() {
                    Some(sink) => sink.deliver(&query, &products),
                    None => warn!("No results sink attached; {} results for {:?} kept", products.len(), query),
                }
                events.push(StorefrontEvent::ResultsDelivered {
                    query: query.clone(),
                    count: products.len(),
                });
                self.last_results = Some((query, products));
            }
            empty @ SearchOutcome::Empty { .. } => {
                events.push(StorefrontEvent::NoResults {
                    query: empty.query().to_string(),
                });
                self.search_box.show_outcome(empty);
            }
        }
    }

    // Rendering

    fn card_state(&self, product: &Product) -> CardState {
        CardState {
            favorite: self.favorites.is_favorite(&product.id),
            added: self.cart_panel.shows_feedback(&product.id),
        }
    }

    /// Product grid for a category, or the whole catalog
    pub fn render_products(&self, category: Option<Category>) -> Result<String, CoreError> {
        let products: Vec<&Product> = match category {
            Some(c) => self.catalog.get_by_category(c),
            None => self.catalog.get_all().iter().collect(),
        };
        render::render_product_grid(products, |p| self.card_state(p))
    }

    pub fn render_cart(&self) -> Result<String, CoreError> {
        render::render_cart_items(self.cart.items())
    }

    /// Dropdown markup, `None` while the panel is hidden
    pub fn render_search_panel(&self) -> Result<Option<String>, CoreError> {
        if self.search_box.visibility() == PanelVisibility::Hidden {
            return Ok(None);
        }
        let html = match self.search_box.content() {
            Some(PanelContent::Suggestions(s)) => render::render_suggestions(s)?,
            Some(PanelContent::Message { text }) => render::render_search_message(text)?,
            Some(PanelContent::Outcome(SearchOutcome::Empty { query, hints })) => {
                render::render_empty_results(query, hints)?
            }
            Some(PanelContent::Outcome(SearchOutcome::Results { .. })) | None => return Ok(None),
        };
        Ok(Some(html))
    }

    pub fn render_search_page(&self, query: &str, products: &[Product]) -> Result<String, CoreError> {
        render::render_search_page(query, products, |p| self.card_state(p))
    }

    pub fn view_state(&self) -> ViewState {
        let theme = self.theme.current();
        ViewState {
            theme,
            theme_icon: theme.icon(),
            cart: self.cart.summary(),
            cart_items: self.cart.items().to_vec(),
            cart_open: self.cart_panel.is_open(),
            favorites: self.favorites.list().to_vec(),
            favorites_count: self.favorites.count(),
            toast: self.toasts.current().cloned(),
            search_input: self.search_box.input().to_string(),
            search_panel: self.search_box.visibility(),
            search_content: self.search_box.content().cloned(),
            search_loading: self.search.is_loading(),
            open_modals: self.modals.open_ids().into_iter().map(String::from).collect(),
            nav_open: self.navigation.is_open(),
            mobile_search_active: self.mobile_search.is_active(),
            login_loading: self.auth.is_loading(AuthFlow::Login),
            register_loading: self.auth.is_loading(AuthFlow::Register),
        }
    }
}
