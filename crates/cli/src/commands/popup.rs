//! `trivan popup` - inspect or set the popup dismissal record.

use trivan_storefront::app::App;

/// Print whether the popup is currently dismissed.
pub fn status(app: &App) {
    if app.popup().is_dismissed() {
        println!("dismissed");
    } else {
        println!("active");
    }
}

/// Dismiss the popup for 30 days.
pub fn dismiss(app: &App) {
    app.popup().dismiss();
    println!("dismissed");
}
