//! HTML fragment rendering.
//!
//! The presentation surface: the product grid, the cart panel, and the
//! navbar cart-count badge are rendered as markup fragments from the
//! in-memory state. View structs carry preformatted strings so templates
//! stay logic-free; whatever UI layer hosts the fragments handles styling
//! and event wiring.

use askama::Template;
use rust_decimal::Decimal;
use tracing::warn;
use trivan_core::{Cart, CurrencyCode, format_amount};

use crate::catalog::CatalogState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub price: String,
    /// Disables the add button and swaps its label to "Added in Cart".
    pub in_cart: bool,
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub price: String,
    pub qty: u32,
    pub line_total: String,
}

/// Catalog failure display data.
#[derive(Clone)]
pub struct CatalogErrorView {
    pub message: String,
    /// Renders a retry affordance when the failure is transient.
    pub retryable: bool,
}

/// Product grid fragment template.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductView>,
    pub loading: bool,
    pub error: Option<CatalogErrorView>,
}

/// Cart panel fragment template.
#[derive(Template)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub items: Vec<CartItemView>,
    pub total: String,
}

/// Cart count badge fragment template.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the product grid for the current catalog state.
///
/// While the catalog is loading or failed, the grid renders the
/// corresponding placeholder instead of an empty page.
///
/// # Errors
///
/// Returns `askama::Error` if template rendering fails.
pub fn render_product_grid(
    catalog: &CatalogState,
    cart: &Cart,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    let template = match catalog {
        CatalogState::Loading => ProductGridTemplate {
            products: Vec::new(),
            loading: true,
            error: None,
        },
        CatalogState::Failed { message, retryable } => ProductGridTemplate {
            products: Vec::new(),
            loading: false,
            error: Some(CatalogErrorView {
                message: message.clone(),
                retryable: *retryable,
            }),
        },
        CatalogState::Ready(catalog) => ProductGridTemplate {
            products: catalog
                .products()
                .iter()
                .map(|product| ProductView {
                    id: product.id.as_i64(),
                    title: product.title.clone(),
                    image: product.image.clone(),
                    price: format_amount(product.price, currency),
                    in_cart: cart.contains(product.id),
                })
                .collect(),
            loading: false,
            error: None,
        },
    };
    template.render()
}

/// Render the cart panel.
///
/// Lines that do not resolve in the catalog are skipped with a warning,
/// the same policy as the total computation, so the remaining lines still
/// render.
///
/// # Errors
///
/// Returns `askama::Error` if template rendering fails.
pub fn render_cart_panel(
    cart: &Cart,
    catalog: &CatalogState,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    let mut items = Vec::with_capacity(cart.lines().len());
    if let CatalogState::Ready(catalog) = catalog {
        for line in cart.lines() {
            let Some(product) = catalog.get(line.id) else {
                warn!(product_id = %line.id, "Cart line does not resolve in catalog, not rendered");
                continue;
            };
            let line_total = product.price * Decimal::from(line.qty);
            items.push(CartItemView {
                id: product.id.as_i64(),
                title: product.title.clone(),
                image: product.image.clone(),
                price: format_amount(product.price, currency),
                qty: line.qty,
                line_total: format_amount(line_total, currency),
            });
        }
    } else if !cart.is_empty() {
        warn!("Cart has lines but the catalog is not ready, rendering empty panel");
    }

    let total = if let CatalogState::Ready(catalog) = catalog {
        cart.total(catalog).amount
    } else {
        Decimal::ZERO
    };

    CartPanelTemplate {
        items,
        total: format_amount(total, currency),
    }
    .render()
}

/// Render the navbar cart-count badge.
///
/// # Errors
///
/// Returns `askama::Error` if template rendering fails.
pub fn render_cart_count(cart: &Cart) -> Result<String, askama::Error> {
    CartCountTemplate {
        count: cart.item_count(),
    }
    .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use trivan_core::{Catalog, Product, ProductId};

    fn fixture_catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: ProductId::new(1),
                title: "Backpack".to_string(),
                image: "https://example.com/1.jpg".to_string(),
                price: "109.95".parse().unwrap(),
            },
            Product {
                id: ProductId::new(2),
                title: "T-Shirt".to_string(),
                image: "https://example.com/2.jpg".to_string(),
                price: "22.30".parse().unwrap(),
            },
        ])
    }

    #[test]
    fn test_product_grid_renders_products_and_button_states() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1)).unwrap();
        let state = CatalogState::Ready(fixture_catalog());

        let html = render_product_grid(&state, &cart, CurrencyCode::USD).unwrap();
        assert!(html.contains("Backpack"));
        assert!(html.contains("$109.95"));
        assert!(html.contains("Added in Cart"));
        assert!(html.contains("Add to Cart"));
        assert!(html.contains(r#"data-id="2""#));
    }

    #[test]
    fn test_product_grid_loading_placeholder() {
        let html =
            render_product_grid(&CatalogState::Loading, &Cart::new(), CurrencyCode::USD).unwrap();
        assert!(html.contains("Loading products"));
    }

    #[test]
    fn test_product_grid_failed_state_offers_retry() {
        let state = CatalogState::Failed {
            message: "Catalog fetch timed out after 10s".to_string(),
            retryable: true,
        };
        let html = render_product_grid(&state, &Cart::new(), CurrencyCode::USD).unwrap();
        assert!(html.contains("timed out"));
        assert!(html.contains("data-retry"));
    }

    #[test]
    fn test_product_grid_failed_state_without_retry() {
        let state = CatalogState::Failed {
            message: "JSON parse error".to_string(),
            retryable: false,
        };
        let html = render_product_grid(&state, &Cart::new(), CurrencyCode::USD).unwrap();
        assert!(!html.contains("data-retry"));
    }

    #[test]
    fn test_cart_panel_empty_message() {
        let state = CatalogState::Ready(fixture_catalog());
        let html = render_cart_panel(&Cart::new(), &state, CurrencyCode::USD).unwrap();
        assert!(html.contains("Your cart is empty."));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn test_cart_panel_renders_lines_and_total() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1)).unwrap();
        cart.increase_qty(ProductId::new(1));
        cart.add(ProductId::new(2)).unwrap();
        let state = CatalogState::Ready(fixture_catalog());

        let html = render_cart_panel(&cart, &state, CurrencyCode::USD).unwrap();
        // 2 x 109.95 line total, 22.30 line, 242.20 grand total
        assert!(html.contains("$219.90"));
        assert!(html.contains("$22.30"));
        assert!(html.contains("$242.20"));
        assert!(html.contains(r#"data-btn="incr""#));
        assert!(html.contains(r#"data-btn="decr""#));
    }

    #[test]
    fn test_cart_panel_skips_dangling_lines() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1)).unwrap();
        cart.add(ProductId::new(99)).unwrap();
        let state = CatalogState::Ready(fixture_catalog());

        let html = render_cart_panel(&cart, &state, CurrencyCode::USD).unwrap();
        assert!(html.contains("Backpack"));
        assert!(!html.contains("data-id=\"99\""));
        assert!(html.contains("$109.95"));
    }

    #[test]
    fn test_cart_panel_escapes_markup_in_titles() {
        let catalog = Catalog::new(vec![Product {
            id: ProductId::new(1),
            title: "<script>alert(1)</script>".to_string(),
            image: "https://example.com/1.jpg".to_string(),
            price: "1.00".parse().unwrap(),
        }]);
        let mut cart = Cart::new();
        cart.add(ProductId::new(1)).unwrap();

        let html =
            render_cart_panel(&cart, &CatalogState::Ready(catalog), CurrencyCode::USD).unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_cart_count_badge_visibility() {
        let mut cart = Cart::new();
        let html = render_cart_count(&cart).unwrap();
        assert!(!html.contains("visible"));

        cart.add(ProductId::new(1)).unwrap();
        cart.increase_qty(ProductId::new(1));
        let html = render_cart_count(&cart).unwrap();
        assert!(html.contains("visible"));
        assert!(html.contains(">2<"));
    }
}
