//! Application wiring shared across entry points.
//!
//! Owns the configuration, the catalog client, the cart manager, and the
//! popup, and drives the session startup flow: load the persisted cart,
//! fetch the catalog, and hand rendered fragments to whoever asked.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::catalog::CatalogClient;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::manager::{CartEvent, CartManager};
use crate::popup::PromoPopup;
use crate::render;
use crate::store::{FileStore, KeyValueStore};

/// Application state shared across all entry points.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: StoreConfig,
    catalog_client: CatalogClient,
    manager: Mutex<CartManager>,
    popup: PromoPopup,
}

impl App {
    /// Create the application over the file-backed store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client cannot be constructed.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        Self::with_store(config, store)
    }

    /// Create the application over an explicit store (tests use
    /// [`crate::store::MemoryStore`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_store(config: StoreConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let catalog_client = CatalogClient::new(&config)?;
        let manager = Mutex::new(CartManager::new(Arc::clone(&store)));
        let popup = PromoPopup::new(store);

        let app = Self {
            inner: Arc::new(AppInner {
                config,
                catalog_client,
                manager,
                popup,
            }),
        };
        app.install_hide_driver();
        Ok(app)
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Lock and return the cart manager.
    pub fn manager(&self) -> MutexGuard<'_, CartManager> {
        self.inner
            .manager
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a reference to the popup state.
    #[must_use]
    pub fn popup(&self) -> &PromoPopup {
        &self.inner.popup
    }

    /// Session startup: load the persisted cart, then fetch the catalog.
    ///
    /// A fetch failure is recorded as a visible, possibly retryable catalog
    /// state; it never fails the session, and the loaded cart stays usable.
    pub async fn init_store(&self) {
        self.manager().load();
        self.fetch_catalog().await;
    }

    /// Re-fetch the catalog after a failure.
    pub async fn retry_catalog(&self) {
        self.manager().catalog_loading();
        self.fetch_catalog().await;
    }

    async fn fetch_catalog(&self) {
        match self.inner.catalog_client.fetch().await {
            Ok(catalog) => self.manager().catalog_loaded(catalog),
            Err(e) => self.manager().catalog_failed(&e),
        }
    }

    /// Render the product grid fragment for the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_products(&self) -> Result<String> {
        let manager = self.manager();
        Ok(render::render_product_grid(
            manager.catalog_state(),
            manager.cart(),
            self.inner.config.currency,
        )?)
    }

    /// Render the cart panel fragment for the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_cart(&self) -> Result<String> {
        let manager = self.manager();
        Ok(render::render_cart_panel(
            manager.cart(),
            manager.catalog_state(),
            self.inner.config.currency,
        )?)
    }

    /// Render the navbar cart-count badge fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_cart_count(&self) -> Result<String> {
        Ok(render::render_cart_count(self.manager().cart())?)
    }

    /// Wire the deferred empty-cart dismissal.
    ///
    /// When the manager schedules a hide, sleep for the delay on the
    /// runtime and then apply it; the manager itself re-checks that the
    /// hide is still wanted. Outside a tokio runtime (plain unit tests)
    /// nothing is spawned and `complete_scheduled_hide` can be called
    /// directly.
    fn install_hide_driver(&self) {
        let weak: Weak<AppInner> = Arc::downgrade(&self.inner);
        self.manager().on(move |event| {
            let CartEvent::HideScheduled(delay) = event else {
                return;
            };
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                return;
            };
            let delay = *delay;
            let weak = weak.clone();
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = weak.upgrade() {
                    inner
                        .manager
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .complete_scheduled_hide();
                }
            });
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::manager::Visibility;
    use crate::store::MemoryStore;
    use trivan_core::{Catalog, Product, ProductId};

    fn fixture_catalog() -> Catalog {
        Catalog::new(vec![Product {
            id: ProductId::new(1),
            title: "Backpack".to_string(),
            image: "https://example.com/1.jpg".to_string(),
            price: "109.95".parse().unwrap(),
        }])
    }

    fn app() -> App {
        App::with_store(StoreConfig::default(), Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_render_before_catalog_loads() {
        let app = app();
        app.manager().load();
        let html = app.render_products().unwrap();
        assert!(html.contains("Loading products"));
        assert!(app.render_cart().unwrap().contains("Your cart is empty."));
    }

    #[test]
    fn test_render_after_catalog_loaded() {
        let app = app();
        app.manager().catalog_loaded(fixture_catalog());
        app.manager().add_item(ProductId::new(1));

        assert!(app.render_products().unwrap().contains("Added in Cart"));
        assert!(app.render_cart().unwrap().contains("$109.95"));
        assert!(app.render_cart_count().unwrap().contains(">1<"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_driver_applies_deferred_hide() {
        let app = app();
        app.manager().catalog_loaded(fixture_catalog());
        app.manager().add_item(ProductId::new(1));
        assert_eq!(app.manager().visibility(), Visibility::Shown);

        app.manager().remove_item(ProductId::new(1));
        assert_eq!(app.manager().visibility(), Visibility::Shown);

        // let the 500ms driver fire under the paused clock
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(app.manager().visibility(), Visibility::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_driver_cancelled_by_reshow() {
        let app = app();
        app.manager().catalog_loaded(fixture_catalog());
        app.manager().add_item(ProductId::new(1));
        app.manager().remove_item(ProductId::new(1));
        app.manager().show_cart();

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(app.manager().visibility(), Visibility::Shown);
    }
}
