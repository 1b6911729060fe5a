//! The cart data model and its pure mutation operations.
//!
//! A [`Cart`] is an insertion-ordered sequence of [`CartLine`]s with two
//! invariants that hold across every operation:
//!
//! - at most one line per product id
//! - `qty >= 1` on every line (a line reaching 0 is deleted, never kept)
//!
//! The cart knows nothing about storage, rendering, or panel visibility;
//! those live in the storefront crate. `serde` support here defines the
//! persisted wire format: `[{"id": 1, "qty": 2}, ...]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Catalog, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product already has a line in the cart.
    ///
    /// This is a user-facing rejection, not a program error: the caller is
    /// expected to surface the notice and leave the cart untouched.
    #[error("Item is already in cart.")]
    AlreadyInCart(ProductId),
}

/// One product-id/quantity pair representing items a user intends to buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Foreign key into the product catalog.
    pub id: ProductId,
    /// Quantity, always >= 1.
    pub qty: u32,
}

/// Result of a total computation over a cart.
///
/// Lines whose product id does not resolve in the catalog are skipped and
/// reported in `unresolved` so the caller can log them; the computation
/// never fails on a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotal {
    /// Sum of unit price x qty over all resolvable lines.
    pub amount: Decimal,
    /// Ids of lines that did not resolve in the catalog.
    pub unresolved: Vec<ProductId>,
}

/// An insertion-ordered shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines (the navbar badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    /// Whether a line for this product exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.lines.iter().any(|line| line.id == id)
    }

    /// Whether every line has `qty >= 1` and no product id repeats.
    ///
    /// The mutation operations uphold this by construction; deserialization
    /// does not, so callers loading a persisted cart must check it and
    /// treat a violating value the same as unparsable JSON.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.lines.iter().enumerate().all(|(i, line)| {
            line.qty >= 1 && !self.lines[..i].iter().any(|prior| prior.id == line.id)
        })
    }

    /// Append a new line with qty 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AlreadyInCart`] if a line for `id` already
    /// exists; the cart is left unchanged.
    pub fn add(&mut self, id: ProductId) -> Result<(), CartError> {
        if self.contains(id) {
            return Err(CartError::AlreadyInCart(id));
        }
        self.lines.push(CartLine { id, qty: 1 });
        Ok(())
    }

    /// Delete the line with this id. Returns whether a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Increment the qty of an existing line. No-op if absent.
    pub fn increase_qty(&mut self, id: ProductId) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.qty = line.qty.saturating_add(1);
        }
    }

    /// Decrement the qty of an existing line. No-op if absent.
    ///
    /// Returns `true` if the line reached 0 and was removed, so callers can
    /// route through the same empty-cart handling as an explicit removal.
    /// A line already at 0 (only reachable through a hand-edited persisted
    /// value) is removed rather than underflowed.
    pub fn decrease_qty(&mut self, id: ProductId) -> bool {
        let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
            return false;
        };
        if line.qty <= 1 {
            self.remove(id);
            return true;
        }
        line.qty -= 1;
        false
    }

    /// Replace the cart with an empty sequence.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Compute the cart total against a catalog.
    ///
    /// Lines whose id does not resolve are skipped and reported in
    /// [`CartTotal::unresolved`]; this happens when a stale persisted cart
    /// meets a changed catalog, or when the catalog has not loaded yet.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> CartTotal {
        let mut amount = Decimal::ZERO;
        let mut unresolved = Vec::new();

        for line in &self.lines {
            match catalog.get(line.id) {
                Some(product) => {
                    amount += product.price * Decimal::from(line.qty);
                }
                None => unresolved.push(line.id),
            }
        }

        CartTotal { amount, unresolved }
    }
}
