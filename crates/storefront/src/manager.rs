//! The cart manager: cart state, persistence glue, and panel visibility.
//!
//! `CartManager` owns the only mutable entity in the system (the cart) and
//! the read-only catalog state. Every mutating operation persists the new
//! cart synchronously before returning, then notifies registered listeners
//! so dependent views (cart panel and product listing) re-render together.
//!
//! # Persistence policy
//!
//! Writes are write-after-attempt: if the store fails, the in-memory
//! mutation is kept and the failure is logged at `error`. Rolling back
//! would discard a user action to protect a store that is already failing.
//!
//! # Visibility state machine
//!
//! Two states, {hidden, shown}. `show_cart` fires on cart-icon activation
//! or a successful `add_item`; `hide_cart` on overlay/close activation.
//! When the cart becomes empty through removal or clear, the hide is
//! *scheduled* instead of immediate, leaving a fixed delay for an exit
//! animation; an async driver applies it via `complete_scheduled_hide`.
//! Catalog loading never blocks visibility transitions or cart mutations.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::instrument;
use trivan_core::{Cart, Catalog, ProductId};

use crate::catalog::{CatalogError, CatalogState};
use crate::config::EMPTY_CART_HIDE_DELAY;
use crate::store::{CART_KEY, KeyValueStore};

/// Cart panel visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// Notifications delivered to registered listeners.
///
/// This is the change-notification hook the UI layer subscribes to instead
/// of the manager depending on any specific UI API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// Cart contents changed; re-render the cart panel and product listing.
    CartChanged,
    /// Catalog state changed (loaded, or failed with a retryable flag).
    CatalogChanged,
    /// An add was rejected because the item is already in the cart.
    /// Surface a user-visible notice; no state changed.
    DuplicateAdd(ProductId),
    /// The cart panel visibility flipped.
    VisibilityChanged(Visibility),
    /// The cart became empty; hide the panel after this delay.
    HideScheduled(Duration),
}

type Listener = Box<dyn Fn(&CartEvent) + Send + Sync>;

/// Owns the cart, the catalog state, and the panel visibility machine.
pub struct CartManager {
    cart: Cart,
    catalog: CatalogState,
    store: Arc<dyn KeyValueStore>,
    visibility: Visibility,
    pending_hide: bool,
    listeners: Vec<Listener>,
}

impl CartManager {
    /// Create a manager over a persistent store, with an empty cart and the
    /// catalog in the `Loading` state.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: Cart::new(),
            catalog: CatalogState::Loading,
            store,
            visibility: Visibility::Hidden,
            pending_hide: false,
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn on(&mut self, listener: impl Fn(&CartEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: &CartEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    // =========================================================================
    // Cart operations
    // =========================================================================

    /// Load the persisted cart.
    ///
    /// A missing or unparsable value is indistinguishable from "no cart
    /// yet": both load as an empty cart, and this never fails visibly.
    /// A value that parses but breaks the cart's shape (a qty-0 line, a
    /// repeated product id) is treated the same as unparsable JSON.
    #[instrument(skip(self))]
    pub fn load(&mut self) {
        self.cart = match self.store.get(CART_KEY) {
            Ok(Some(value)) => match serde_json::from_str::<Cart>(&value) {
                Ok(cart) if cart.is_well_formed() => cart,
                Ok(_) => {
                    tracing::warn!("Persisted cart has invalid lines, starting empty");
                    Cart::new()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted cart is malformed, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted cart, starting empty");
                Cart::new()
            }
        };
    }

    /// Add a product to the cart with qty 1.
    ///
    /// A duplicate id is rejected: the cart is left unchanged and a
    /// [`CartEvent::DuplicateAdd`] notice is raised instead of an error.
    /// On success the cart is persisted, listeners are notified, and the
    /// panel is shown. Catalog membership is not enforced here; the UI
    /// affordance is expected to have validated it.
    ///
    /// Returns whether the item was added.
    #[instrument(skip(self), fields(id = %id))]
    pub fn add_item(&mut self, id: ProductId) -> bool {
        if self.cart.add(id).is_err() {
            self.emit(&CartEvent::DuplicateAdd(id));
            return false;
        }
        self.save();
        self.emit(&CartEvent::CartChanged);
        self.show_cart();
        true
    }

    /// Remove the line for this product, if present.
    #[instrument(skip(self), fields(id = %id))]
    pub fn remove_item(&mut self, id: ProductId) {
        if !self.cart.remove(id) {
            return;
        }
        self.save();
        self.emit(&CartEvent::CartChanged);
        if self.cart.is_empty() {
            self.schedule_hide();
        }
    }

    /// Increment the qty of an existing line. No-op if absent.
    pub fn increase_qty(&mut self, id: ProductId) {
        if !self.cart.contains(id) {
            return;
        }
        self.cart.increase_qty(id);
        self.save();
        self.emit(&CartEvent::CartChanged);
    }

    /// Decrement the qty of an existing line. No-op if absent.
    ///
    /// Reaching 0 removes the line and routes through the same empty-cart
    /// deferred-dismiss behavior as an explicit removal.
    pub fn decrease_qty(&mut self, id: ProductId) {
        if !self.cart.contains(id) {
            return;
        }
        self.cart.decrease_qty(id);
        self.save();
        self.emit(&CartEvent::CartChanged);
        if self.cart.is_empty() {
            self.schedule_hide();
        }
    }

    /// Replace the cart with an empty sequence.
    ///
    /// Persists the empty sequence even when the cart was already empty.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.save();
        self.emit(&CartEvent::CartChanged);
        if self.visibility == Visibility::Shown {
            self.schedule_hide();
        }
    }

    /// Compute the cart total against the loaded catalog.
    ///
    /// Lines that do not resolve (stale persisted cart, or catalog still
    /// loading) are skipped with a warning; the computation never fails.
    #[must_use]
    pub fn total(&self) -> Decimal {
        let empty = Catalog::default();
        let catalog = self.catalog.catalog().unwrap_or(&empty);
        let total = self.cart.total(catalog);
        for id in &total.unresolved {
            tracing::warn!(product_id = %id, "Cart line does not resolve in catalog, skipped");
        }
        total.amount
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Whether a line for this product exists.
    #[must_use]
    pub fn in_cart(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    /// The cart, read-only.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    // =========================================================================
    // Catalog state
    // =========================================================================

    /// Mark the catalog as loading (initial fetch or retry).
    pub fn catalog_loading(&mut self) {
        self.catalog = CatalogState::Loading;
        self.emit(&CartEvent::CatalogChanged);
    }

    /// Install a fetched catalog.
    pub fn catalog_loaded(&mut self, catalog: Catalog) {
        self.catalog = CatalogState::Ready(catalog);
        self.emit(&CartEvent::CatalogChanged);
    }

    /// Record a catalog fetch failure as a visible, possibly retryable state.
    pub fn catalog_failed(&mut self, error: &CatalogError) {
        tracing::warn!(error = %error, retryable = error.is_retryable(), "Catalog fetch failed");
        self.catalog = CatalogState::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        };
        self.emit(&CartEvent::CatalogChanged);
    }

    /// The catalog lifecycle state.
    #[must_use]
    pub const fn catalog_state(&self) -> &CatalogState {
        &self.catalog
    }

    // =========================================================================
    // Visibility state machine
    // =========================================================================

    /// Current panel visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Show the cart panel. Cancels any pending deferred hide.
    pub fn show_cart(&mut self) {
        self.pending_hide = false;
        if self.visibility == Visibility::Hidden {
            self.visibility = Visibility::Shown;
            self.emit(&CartEvent::VisibilityChanged(Visibility::Shown));
        }
    }

    /// Hide the cart panel immediately (overlay or close activation).
    pub fn hide_cart(&mut self) {
        self.pending_hide = false;
        if self.visibility == Visibility::Shown {
            self.visibility = Visibility::Hidden;
            self.emit(&CartEvent::VisibilityChanged(Visibility::Hidden));
        }
    }

    /// Whether a deferred hide is pending.
    #[must_use]
    pub const fn hide_pending(&self) -> bool {
        self.pending_hide
    }

    /// Apply a previously scheduled hide.
    ///
    /// Called by the async driver after [`EMPTY_CART_HIDE_DELAY`]. Only
    /// hides if the hide is still pending and the cart is still empty; a
    /// `show_cart` or a new add in the meantime cancels it.
    pub fn complete_scheduled_hide(&mut self) {
        if self.pending_hide && self.cart.is_empty() {
            self.hide_cart();
        }
        self.pending_hide = false;
    }

    fn schedule_hide(&mut self) {
        self.pending_hide = true;
        self.emit(&CartEvent::HideScheduled(EMPTY_CART_HIDE_DELAY));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Persist the cart. Keeps the in-memory state on failure.
    fn save(&self) {
        let serialized = match serde_json::to_string(&self.cart) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.put(CART_KEY, &serialized) {
            tracing::error!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}
