// HTML fragments for product cards, the cart list and search panels
// Templates live in `templates/`; askama escapes every interpolated value

use crate::error::CoreError;
use crate::models::{format_price, CartLineItem, Product};
use crate::search::Suggestions;
use crate::ui::cart_panel::{ADDED_LABEL, ADD_LABEL};
use askama::Template;

/// Display-ready fields of one product card
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub price: String,
    /// Empty when there is no struck-through price
    pub original_price: String,
    pub badge_class: &'static str,
    pub badge_label: &'static str,
    pub favorite: bool,
    pub favorite_icon: &'static str,
    pub added: bool,
    pub button_icon: &'static str,
    pub button_label: &'static str,
}

/// Per-card state that does not come from the product itself
#[derive(Debug, Clone, Copy, Default)]
pub struct CardState {
    pub favorite: bool,
    /// The "Adicionado!" affordance is showing
    pub added: bool,
}

impl CardView {
    pub fn new(product: &Product, state: CardState) -> Self {
        let (badge_class, badge_label) = match product.badge {
            Some(badge) => (badge.as_str(), badge.label()),
            None => ("", ""),
        };
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            price: format_price(product.price),
            original_price: product.original_price.map(format_price).unwrap_or_default(),
            badge_class,
            badge_label,
            favorite: state.favorite,
            favorite_icon: if state.favorite { "favorite" } else { "favorite_border" },
            added: state.added,
            button_icon: if state.added { "check" } else { "shopping_cart" },
            button_label: if state.added { ADDED_LABEL } else { ADD_LABEL },
        }
    }
}

#[derive(Template)]
#[template(path = "product_card.html")]
struct ProductCardTemplate {
    card: CardView,
}

#[derive(Template)]
#[template(path = "product_grid.html")]
struct ProductGridTemplate {
    cards: Vec<CardView>,
}

struct LineView {
    id: String,
    name: String,
    image: String,
    price: String,
    quantity: u32,
}

#[derive(Template)]
#[template(path = "cart_items.html")]
struct CartItemsTemplate {
    lines: Vec<LineView>,
}

#[derive(Template)]
#[template(path = "search_page.html")]
struct SearchPageTemplate {
    query: String,
    count: usize,
    cards: Vec<CardView>,
}

struct SuggestionView {
    id: String,
    name: String,
    image: String,
    price: String,
}

#[derive(Template)]
#[template(path = "suggestions.html")]
struct SuggestionsTemplate {
    title: &'static str,
    items: Vec<SuggestionView>,
}

#[derive(Template)]
#[template(path = "search_empty.html")]
struct SearchEmptyTemplate<'a> {
    query: &'a str,
    hints: &'a [&'static str],
}

#[derive(Template)]
#[template(path = "search_message.html")]
struct SearchMessageTemplate<'a> {
    text: &'a str,
}

pub fn render_product_card(product: &Product, state: CardState) -> Result<String, CoreError> {
    let template = ProductCardTemplate {
        card: CardView::new(product, state),
    };
    Ok(template.render()?)
}

/// Render a grid of cards; `state` supplies favorite/added flags per product
pub fn render_product_grid<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    state: impl Fn(&Product) -> CardState,
) -> Result<String, CoreError> {
    let cards = products.into_iter().map(|p| CardView::new(p, state(p))).collect();
    Ok(ProductGridTemplate { cards }.render()?)
}

/// Cart sidebar lines, or the empty-cart placeholder
pub fn render_cart_items(items: &[CartLineItem]) -> Result<String, CoreError> {
    let lines = items
        .iter()
        .map(|item| LineView {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            price: format_price(item.price),
            quantity: item.quantity,
        })
        .collect();
    Ok(CartItemsTemplate { lines }.render()?)
}

/// Body of the results page
pub fn render_search_page(
    query: &str,
    products: &[Product],
    state: impl Fn(&Product) -> CardState,
) -> Result<String, CoreError> {
    let template = SearchPageTemplate {
        query: query.to_string(),
        count: products.len(),
        cards: products.iter().map(|p| CardView::new(p, state(p))).collect(),
    };
    Ok(template.render()?)
}

pub fn render_suggestions(suggestions: &Suggestions) -> Result<String, CoreError> {
    let items = suggestions
        .products
        .iter()
        .map(|p| SuggestionView {
            id: p.id.clone(),
            name: p.name.clone(),
            image: p.image.clone(),
            price: format_price(p.price),
        })
        .collect();
    let template = SuggestionsTemplate {
        title: suggestions.title,
        items,
    };
    Ok(template.render()?)
}

pub fn render_empty_results(query: &str, hints: &[&'static str]) -> Result<String, CoreError> {
    Ok(SearchEmptyTemplate { query, hints }.render()?)
}

pub fn render_search_message(text: &str) -> Result<String, CoreError> {
    Ok(SearchMessageTemplate { text }.render()?)
}
