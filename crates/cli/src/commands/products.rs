//! `trivan products` - fetch the catalog and print the product grid.

use trivan_storefront::app::App;
use trivan_storefront::catalog::CatalogState;

/// Fetch the catalog and print the rendered product grid fragment.
///
/// A fetch failure renders the error placeholder (with a retry affordance
/// when transient) rather than aborting the command.
pub async fn show(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    app.init_store().await;

    if let CatalogState::Failed { message, retryable } = app.manager().catalog_state() {
        tracing::warn!(retryable, "Catalog unavailable: {message}");
    }

    println!("{}", app.render_products()?);
    Ok(())
}
