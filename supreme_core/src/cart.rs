// Shopping cart service

use crate::models::{CartLineItem, Product};
use crate::persisted::PersistedCollection;
use crate::storage_trait::{keys, StorageBackend};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Badge/summary figures derived from the cart lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub count: u32,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub checkout_enabled: bool,
}

/// Largest quantity a single line can hold
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Quantity-tracked line items persisted in the `cart` slot.
///
/// Invariants: at most one line per product id, every stored quantity is at
/// least 1 and at most [`MAX_LINE_QUANTITY`]. Every mutating call writes the
/// slot before returning.
pub struct Cart<S> {
    lines: PersistedCollection<CartLineItem, S>,
}

impl<S: StorageBackend> Cart<S> {
    pub fn load(store: Arc<S>) -> Self {
        let lines = PersistedCollection::load(store, keys::CART);
        // Older data may carry zero-quantity or oversized lines.
        let mut cart = Self { lines };
        if cart
            .lines
            .items()
            .iter()
            .any(|l| l.quantity == 0 || l.quantity > MAX_LINE_QUANTITY)
        {
            cart.lines.update(|items| {
                items.retain(|l| l.quantity > 0);
                for line in items.iter_mut() {
                    line.quantity = line.quantity.min(MAX_LINE_QUANTITY);
                }
            });
        }
        cart
    }

    /// Add one unit of `product`. Returns the line's new quantity; a line
    /// already at the cap stays there.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        let quantity = self.lines.update(|items| {
            match items.iter_mut().find(|l| l.id == product.id) {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(1).min(MAX_LINE_QUANTITY);
                    line.quantity
                }
                None => {
                    items.push(CartLineItem::from_product(product));
                    1
                }
            }
        });
        debug!("Cart: {} now x{}", product.id, quantity);
        quantity
    }

    /// Delete the line for `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.lines.update(|items| items.retain(|l| l.id != id));
        debug!("Cart: removed {}", id);
        true
    }

    /// Overwrite the quantity of an existing line. `qty <= 0` removes it;
    /// larger values are clamped to [`MAX_LINE_QUANTITY`]; unknown ids are
    /// ignored. Returns whether the id was in the cart.
    pub fn set_quantity(&mut self, id: &str, qty: i64) -> bool {
        if !self.contains(id) {
            return false;
        }
        if qty <= 0 {
            return self.remove_item(id);
        }
        let qty = u32::try_from(qty)
            .unwrap_or(MAX_LINE_QUANTITY)
            .min(MAX_LINE_QUANTITY);
        self.lines.update(|items| {
            if let Some(line) = items.iter_mut().find(|l| l.id == id) {
                line.quantity = qty;
            }
        });
        true
    }

    /// The "+" control
    pub fn increment(&mut self, id: &str) -> bool {
        match self.quantity_of(id) {
            Some(q) => self.set_quantity(id, i64::from(q) + 1),
            None => false,
        }
    }

    /// The "-" control; a line at quantity 1 is removed
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.quantity_of(id) {
            Some(q) => self.set_quantity(id, i64::from(q) - 1),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.update(|items| items.clear());
    }

    pub fn items(&self) -> &[CartLineItem] {
        self.lines.items()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items().iter().any(|l| l.id == id)
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.items().iter().find(|l| l.id == id).map(|l| l.quantity)
    }

    pub fn get_subtotal(&self) -> Decimal {
        self.items().iter().map(CartLineItem::line_total).sum()
    }

    /// No shipping, tax or discounts: the total is the subtotal.
    pub fn get_total(&self) -> Decimal {
        self.get_subtotal()
    }

    /// Sum of quantities (not line count)
    pub fn get_count(&self) -> u32 {
        self.items()
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn can_checkout(&self) -> bool {
        !self.is_empty()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            count: self.get_count(),
            subtotal: self.get_subtotal(),
            total: self.get_total(),
            checkout_enabled: self.can_checkout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::storage_trait::MemoryStorage;

    fn setup() -> (Arc<MemoryStorage>, Catalog, Cart<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        let cart = Cart::load(store.clone());
        (store, Catalog::seeded(), cart)
    }

    #[test]
    fn test_empty_cart() {
        let (_, _, cart) = setup();
        assert_eq!(cart.get_total(), Decimal::ZERO);
        assert_eq!(cart.get_count(), 0);
        assert!(!cart.can_checkout());
        assert!(!cart.summary().checkout_enabled);
    }

    #[test]
    fn test_add_twice_equals_add_then_set_two() {
        let (_, catalog, mut a) = setup();
        let (_, _, mut b) = setup();
        let whey = catalog.get_by_id("whey-1").unwrap();

        a.add_item(whey);
        a.add_item(whey);

        b.add_item(whey);
        b.set_quantity("whey-1", 2);

        assert_eq!(a.items(), b.items());
        assert_eq!(a.items().len(), 1);
        assert_eq!(a.quantity_of("whey-1"), Some(2));
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let (_, catalog, mut a) = setup();
        let (_, _, mut b) = setup();
        for cart in [&mut a, &mut b] {
            cart.add_item(catalog.get_by_id("whey-1").unwrap());
            cart.add_item(catalog.get_by_id("pre-2").unwrap());
        }
        a.set_quantity("whey-1", 0);
        b.remove_item("whey-1");
        assert_eq!(a.items(), b.items());
        assert!(!a.contains("whey-1"));

        a.set_quantity("pre-2", -4);
        assert!(a.is_empty());
    }

    #[test]
    fn test_totals_and_count() {
        let (_, catalog, mut cart) = setup();
        cart.add_item(catalog.get_by_id("whey-1").unwrap()); // 101.99
        cart.add_item(catalog.get_by_id("whey-1").unwrap());
        cart.add_item(catalog.get_by_id("creatina-4").unwrap()); // 79.99
        assert_eq!(cart.get_count(), 3);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get_subtotal(), Decimal::new(28397, 2));
        assert_eq!(cart.get_total(), cart.get_subtotal());
        assert!(cart.can_checkout());
    }

    #[test]
    fn test_increment_decrement() {
        let (_, catalog, mut cart) = setup();
        cart.add_item(catalog.get_by_id("pre-1").unwrap());
        assert!(cart.increment("pre-1"));
        assert_eq!(cart.quantity_of("pre-1"), Some(2));
        assert!(cart.decrement("pre-1"));
        assert!(cart.decrement("pre-1"));
        assert!(cart.is_empty());
        assert!(!cart.decrement("pre-1"));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (store, _, mut cart) = setup();
        assert!(!cart.remove_item("nope"));
        assert!(!cart.set_quantity("nope", 3));
        assert!(cart.is_empty());
        assert!(store.get_raw(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let (store, catalog, mut cart) = setup();
        cart.add_item(catalog.get_by_id("whey-3").unwrap());
        cart.set_quantity("whey-3", 4);

        let reloaded = Cart::load(store.clone());
        assert_eq!(reloaded.items(), cart.items());
        assert_eq!(reloaded.get_count(), 4);

        cart.clear();
        assert_eq!(store.get_raw(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_slot_starts_empty() {
        let store = Arc::new(MemoryStorage::new());
        store.set_raw(keys::CART, "not json at all").unwrap();
        let cart = Cart::load(store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_quantity_is_clamped_and_add_stays_at_cap() {
        let (store, catalog, mut cart) = setup();
        let whey = catalog.get_by_id("whey-1").unwrap();
        cart.add_item(whey);
        assert!(cart.set_quantity("whey-1", i64::MAX));
        assert_eq!(cart.quantity_of("whey-1"), Some(MAX_LINE_QUANTITY));
        assert_eq!(cart.add_item(whey), MAX_LINE_QUANTITY);
        assert!(cart.increment("whey-1"));
        assert_eq!(cart.quantity_of("whey-1"), Some(MAX_LINE_QUANTITY));

        let reloaded = Cart::load(store);
        assert_eq!(reloaded.quantity_of("whey-1"), Some(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_count_of_large_lines_does_not_overflow() {
        let (_, catalog, mut cart) = setup();
        cart.add_item(catalog.get_by_id("whey-1").unwrap());
        cart.add_item(catalog.get_by_id("creatina-1").unwrap());
        cart.set_quantity("whey-1", 3_000_000_000);
        cart.set_quantity("creatina-1", 3_000_000_000);
        assert_eq!(cart.get_count(), 2 * MAX_LINE_QUANTITY);
        assert_eq!(
            cart.get_total(),
            cart.items().iter().map(CartLineItem::line_total).sum::<Decimal>()
        );
    }

    #[test]
    fn test_oversized_persisted_quantity_clamped_on_load() {
        let store = Arc::new(MemoryStorage::new());
        store
            .set_raw(
                keys::CART,
                r#"[{"id":"a","name":"A","price":"1.00","image":"","quantity":4294967295},
                    {"id":"b","name":"B","price":"2.00","image":"","quantity":4294967295}]"#,
            )
            .unwrap();
        let mut cart = Cart::load(store);
        assert_eq!(cart.get_count(), 2 * MAX_LINE_QUANTITY);
        assert!(cart.increment("a"));
        assert_eq!(cart.quantity_of("a"), Some(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_zero_quantity_lines_dropped_on_load() {
        let store = Arc::new(MemoryStorage::new());
        store
            .set_raw(
                keys::CART,
                r#"[{"id":"a","name":"A","price":"1.00","image":"","quantity":0},
                    {"id":"b","name":"B","price":"2.00","image":"","quantity":2}]"#,
            )
            .unwrap();
        let cart = Cart::load(store);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get_count(), 2);
    }
}
