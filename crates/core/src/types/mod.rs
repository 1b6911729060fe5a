//! Core types for Trivan.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{CurrencyCode, Price, format_amount};
pub use product::{Catalog, Product};
