//! Trivan Core - Shared domain types.
//!
//! This crate provides the domain model used across all Trivan components:
//! - `storefront` - Catalog fetching, cart management, and rendering
//! - `cli` - Command-line tools for operating the store
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and products
//! - [`cart`] - The cart data model and its pure mutation operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartTotal};
pub use types::*;
