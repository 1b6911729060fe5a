//! `trivan cart` - mutate and display the persisted cart.
//!
//! Every mutation loads the persisted cart first, applies the operation
//! through the cart manager (which persists before returning), and prints
//! the re-rendered cart fragments.

use trivan_core::{Price, ProductId};
use trivan_storefront::app::App;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print the cart panel and count badge.
pub async fn show(app: &App) -> CommandResult {
    app.init_store().await;
    print_cart(app)
}

/// Add a product to the cart.
///
/// A duplicate add prints the user-visible notice and leaves the cart
/// unchanged; it is not a command failure.
pub async fn add(app: &App, id: ProductId) -> CommandResult {
    app.init_store().await;
    if !app.manager().add_item(id) {
        println!("Item is already in cart.");
        return Ok(());
    }
    print_cart(app)
}

/// Remove a product from the cart.
pub async fn remove(app: &App, id: ProductId) -> CommandResult {
    app.init_store().await;
    app.manager().remove_item(id);
    print_cart(app)
}

/// Increase the quantity of a cart line.
pub async fn increase(app: &App, id: ProductId) -> CommandResult {
    app.init_store().await;
    app.manager().increase_qty(id);
    print_cart(app)
}

/// Decrease the quantity of a cart line.
pub async fn decrease(app: &App, id: ProductId) -> CommandResult {
    app.init_store().await;
    app.manager().decrease_qty(id);
    print_cart(app)
}

/// Empty the cart.
pub async fn clear(app: &App) -> CommandResult {
    app.init_store().await;
    app.manager().clear();
    print_cart(app)
}

/// Print the formatted cart total.
pub async fn total(app: &App) -> CommandResult {
    app.init_store().await;
    let price = Price::new(app.manager().total(), app.config().currency);
    println!("{}", price.display());
    Ok(())
}

fn print_cart(app: &App) -> CommandResult {
    println!("{}", app.render_cart()?);
    println!("{}", app.render_cart_count()?);
    Ok(())
}
