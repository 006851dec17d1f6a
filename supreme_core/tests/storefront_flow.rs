use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use supreme_core::storefront::StorefrontEvent;
use supreme_core::{
    keys, Catalog, Category, ExecuteStatus, MemoryStorage, Product, ResultsSink, Settings,
    StorageBackend, Storefront, Theme,
};

type Delivered = Rc<RefCell<Vec<(String, Vec<String>)>>>;

struct CollectingSink(Delivered);

impl ResultsSink for CollectingSink {
    fn deliver(&mut self, query: &str, results: &[Product]) {
        let ids = results.iter().map(|p| p.id.clone()).collect();
        self.0.borrow_mut().push((query.to_string(), ids));
    }
}

fn open(store: Arc<MemoryStorage>) -> Storefront<MemoryStorage> {
    Storefront::init(store, Settings::default(), Arc::new(Catalog::seeded()), false).unwrap()
}

#[test]
fn cart_and_favorites_survive_a_reload() {
    let store = Arc::new(MemoryStorage::new());
    {
        let mut sf = open(store.clone());
        sf.add_to_cart("whey-1").unwrap();
        sf.add_to_cart("whey-1").unwrap();
        sf.add_to_cart("creatina-1").unwrap();
        sf.toggle_favorite("pre-2").unwrap();
        sf.set_theme(Theme::Dark);
        sf.teardown();
    }

    assert!(store.exists(keys::CART).unwrap());
    assert!(store.exists(keys::FAVORITES).unwrap());

    let sf = open(store);
    assert_eq!(sf.cart().get_count(), 3);
    assert_eq!(sf.cart().quantity_of("whey-1"), Some(2));
    assert!(sf.favorites().is_favorite("pre-2"));
    assert_eq!(sf.theme(), Theme::Dark);

    let state = sf.view_state();
    assert_eq!(state.favorites_count, 1);
    assert_eq!(state.cart_items.len(), 2);
}

#[test]
fn quantity_edits_drive_totals() {
    let mut sf = open(Arc::new(MemoryStorage::new()));
    sf.add_to_cart("creatina-1").unwrap();
    let unit = sf.cart().get_total();

    assert!(sf.set_quantity("creatina-1", 4));
    assert_eq!(sf.cart().get_total(), unit * rust_decimal::Decimal::from(4));

    sf.decrement("creatina-1");
    assert_eq!(sf.cart().quantity_of("creatina-1"), Some(3));

    assert!(sf.set_quantity("creatina-1", 0));
    assert!(sf.cart().is_empty());
    assert!(!sf.cart().can_checkout());
}

#[test]
fn typed_search_then_submit_reaches_the_sink() {
    let delivered: Delivered = Rc::default();
    let mut sf = open(Arc::new(MemoryStorage::new()));
    sf.set_results_sink(Box::new(CollectingSink(delivered.clone())));

    sf.search_focus();
    sf.search_input("creat");
    let panel = sf.render_search_panel().unwrap().unwrap();
    assert!(panel.contains("Sugestões"));

    assert!(matches!(sf.submit_search(), ExecuteStatus::Pending(_)));
    let events = sf.advance(Duration::from_millis(300));
    assert!(matches!(
        events.as_slice(),
        [StorefrontEvent::ResultsDelivered { query, count }] if query == "creat" && *count == 4
    ));

    let delivered = delivered.borrow();
    let (query, ids) = &delivered[0];
    assert_eq!(query, "creat");
    let creatinas: Vec<String> = sf
        .catalog()
        .get_by_category(Category::Creatina)
        .into_iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(ids, &creatinas);
}

#[test]
fn newer_search_replaces_pending_one() {
    let delivered: Delivered = Rc::default();
    let mut sf = open(Arc::new(MemoryStorage::new()));
    sf.set_results_sink(Box::new(CollectingSink(delivered.clone())));

    sf.execute_search("whey");
    sf.advance(Duration::from_millis(150));
    sf.execute_search("creatina");
    sf.advance(Duration::from_millis(1000));

    let delivered = delivered.borrow();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "creatina");
}

#[test]
fn one_long_advance_runs_every_follow_up() {
    let mut sf = open(Arc::new(MemoryStorage::new()));
    sf.add_to_cart("pre-1").unwrap();
    sf.toggle_favorite("pre-1").unwrap();

    let events = sf.advance(Duration::from_secs(10));
    assert!(events.contains(&StorefrontEvent::CartOpened));
    assert!(events.contains(&StorefrontEvent::CartFeedbackCleared {
        id: "pre-1".to_string()
    }));
    assert!(sf.toasts().current().is_none());
    assert_eq!(sf.next_due_in(), None);
}
