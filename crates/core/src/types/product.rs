//! Product and catalog types.
//!
//! Products are sourced wholesale from an external catalog service and never
//! mutated locally. The [`Catalog`] wraps the fetched list as a read-only
//! lookup table keyed by id, preserving the source order for rendering.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A purchasable product from the external catalog.
///
/// Matches the catalog service's JSON contract: `id`, `title`, `image`,
/// `price`. Prices arrive as JSON numbers and are parsed into [`Decimal`]
/// to keep cart arithmetic exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-assigned product id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image URL.
    pub image: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// The read-only product catalog for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a fetched product list.
    ///
    /// If the source contains duplicate ids, the first occurrence wins for
    /// lookups; the full list is kept for rendering.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            by_id.entry(product.id).or_insert(index);
        }
        Self { products, by_id }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).and_then(|&index| self.products.get(index))
    }

    /// Whether the catalog contains a product with this id.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Products in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
