//! Trivan Storefront library.
//!
//! The stateful heart of the store: a cart manager mediating between user
//! actions, persistent key-value storage, and rendered HTML fragments, plus
//! a catalog client that fetches the read-only product list once per
//! session.
//!
//! # Architecture
//!
//! - [`manager::CartManager`] owns the cart, the catalog state, and the
//!   cart-panel visibility state machine; every mutation persists before
//!   returning and notifies registered listeners so dependent views
//!   re-render.
//! - [`catalog::CatalogClient`] performs the single HTTP fetch of the
//!   product catalog, with an explicit timeout and a retryable error state.
//! - [`store`] abstracts the persisted key-value store (file-backed in
//!   production, in-memory for tests); last-writer-wins, no transactions.
//! - [`render`] turns the in-memory state into HTML fragments via Askama.
//! - [`popup`] records the promotional popup dismissal with a 30-day
//!   expiry, independent of the cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod popup;
pub mod render;
pub mod store;
