//! End-to-end cart flows over an in-memory store and a fixture catalog.
//!
//! No network: the catalog is installed directly on the manager, which is
//! exactly what `App::init_store` does after a successful fetch.

use std::sync::Arc;

use trivan_core::{Catalog, Product, ProductId};
use trivan_storefront::app::App;
use trivan_storefront::config::StoreConfig;
use trivan_storefront::manager::Visibility;
use trivan_storefront::store::{CART_KEY, KeyValueStore, MemoryStore};

fn fixture_catalog() -> Catalog {
    Catalog::new(vec![
        Product {
            id: ProductId::new(1),
            title: "A".to_string(),
            image: "https://example.com/1.jpg".to_string(),
            price: "10.00".parse().expect("valid price"),
        },
        Product {
            id: ProductId::new(2),
            title: "B".to_string(),
            image: "https://example.com/2.jpg".to_string(),
            price: "5.50".parse().expect("valid price"),
        },
    ])
}

fn app_over(store: Arc<MemoryStore>) -> App {
    let app = App::with_store(StoreConfig::default(), store).expect("app builds");
    app.manager().load();
    app.manager().catalog_loaded(fixture_catalog());
    app
}

#[test]
fn shopping_session_reaches_expected_total() {
    let store = Arc::new(MemoryStore::new());
    let app = app_over(store);

    let mut manager = app.manager();
    assert!(manager.add_item(ProductId::new(1)));
    assert!(manager.add_item(ProductId::new(2)));
    manager.increase_qty(ProductId::new(1));

    let lines = manager.cart().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!((lines[0].id, lines[0].qty), (ProductId::new(1), 2));
    assert_eq!((lines[1].id, lines[1].qty), (ProductId::new(2), 1));
    assert_eq!(manager.total(), "25.50".parse().expect("decimal"));
}

#[test]
fn cart_survives_a_new_session() {
    let store = Arc::new(MemoryStore::new());
    {
        let app = app_over(Arc::clone(&store));
        let mut manager = app.manager();
        manager.add_item(ProductId::new(2));
        manager.add_item(ProductId::new(1));
        manager.increase_qty(ProductId::new(2));
    }

    // same persisted store, fresh session
    let app = app_over(store);
    let manager = app.manager();
    let lines = manager.cart().lines();
    assert_eq!((lines[0].id, lines[0].qty), (ProductId::new(2), 2));
    assert_eq!((lines[1].id, lines[1].qty), (ProductId::new(1), 1));
    assert_eq!(manager.item_count(), 3);
}

#[test]
fn stale_persisted_cart_against_changed_catalog_is_skipped() {
    // a previous session put a product in the cart that the catalog no
    // longer carries
    let store = Arc::new(MemoryStore::with_entries([(
        CART_KEY.to_string(),
        r#"[{"id":77,"qty":3},{"id":1,"qty":1}]"#.to_string(),
    )]));
    let app = app_over(store);

    assert_eq!(app.manager().total(), "10.00".parse().expect("decimal"));
    let cart_html = app.render_cart().expect("renders");
    assert!(!cart_html.contains(r#"data-id="77""#));
    assert!(cart_html.contains("$10.00"));
}

#[test]
fn corrupt_persisted_cart_loads_as_empty() {
    let store = Arc::new(MemoryStore::with_entries([(
        CART_KEY.to_string(),
        "not json".to_string(),
    )]));
    let app = app_over(store);
    assert!(app.manager().cart().is_empty());
}

#[test]
fn persisted_cart_with_zero_qty_line_loads_as_empty() {
    // valid JSON, invalid cart: a hand-edited store must not smuggle a
    // qty-0 line past the quantity operations
    let store = Arc::new(MemoryStore::with_entries([(
        CART_KEY.to_string(),
        r#"[{"id":1,"qty":0}]"#.to_string(),
    )]));
    let app = app_over(store);

    assert!(app.manager().cart().is_empty());
    app.manager().decrease_qty(ProductId::new(1));
    assert!(app.manager().cart().is_empty());
}

#[test]
fn duplicate_add_leaves_persisted_state_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let app = app_over(Arc::clone(&store));
    app.manager().add_item(ProductId::new(1));
    let persisted_before = store.get(CART_KEY).expect("read").expect("present");

    assert!(!app.manager().add_item(ProductId::new(1)));
    let persisted_after = store.get(CART_KEY).expect("read").expect("present");
    assert_eq!(persisted_before, persisted_after);
}

#[tokio::test(start_paused = true)]
async fn emptying_the_cart_dismisses_the_panel_after_the_delay() {
    let app = app_over(Arc::new(MemoryStore::new()));
    app.manager().add_item(ProductId::new(1));
    assert_eq!(app.manager().visibility(), Visibility::Shown);

    app.manager().decrease_qty(ProductId::new(1));
    assert!(app.manager().cart().is_empty());
    assert_eq!(app.manager().visibility(), Visibility::Shown);

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;
    assert_eq!(app.manager().visibility(), Visibility::Hidden);
}

#[test]
fn clear_on_empty_cart_persists_empty_and_stays_hidden() {
    let store = Arc::new(MemoryStore::new());
    let app = app_over(Arc::clone(&store));

    app.manager().clear();
    assert_eq!(store.get(CART_KEY).expect("read").as_deref(), Some("[]"));
    assert_eq!(app.manager().visibility(), Visibility::Hidden);
}

#[test]
fn product_grid_reflects_cart_membership() {
    let app = app_over(Arc::new(MemoryStore::new()));
    app.manager().add_item(ProductId::new(1));

    let html = app.render_products().expect("renders");
    assert!(html.contains("Added in Cart"));
    assert!(html.contains("Add to Cart"));
}

#[test]
fn popup_dismissal_is_independent_of_the_cart() {
    let app = app_over(Arc::new(MemoryStore::new()));
    assert!(!app.popup().is_dismissed());

    app.popup().dismiss();
    app.manager().clear();
    assert!(app.popup().is_dismissed());
    assert!(app.manager().cart().is_empty());
}
