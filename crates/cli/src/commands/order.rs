//! Order commands.
//!
//! # Usage
//!
//! ```bash
//! CLOUDMART_API_URL=http://localhost:5000/api cloudmart order place -e shopper@example.com
//! ```

use cloudmart_cart::{CartStore, HttpOrderSubmitter, KeyValueStore, place_order};
use cloudmart_core::Email;
use tracing::info;
use url::Url;

/// Submit the cart as an order and clear it on success.
///
/// # Errors
///
/// Returns an error if the email is invalid, the HTTP client cannot be built,
/// or checkout fails (empty cart, order API error).
pub async fn place<S: KeyValueStore>(
    store: &CartStore<S>,
    api_url: &Url,
    email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email).map_err(|e| format!("Invalid email {email:?}: {e}"))?;
    let submitter = HttpOrderSubmitter::new(api_url)?;

    info!(endpoint = %submitter.orders_url(), "Submitting order");
    let order = place_order(store, &submitter, Some(&email)).await?;

    info!("Order placed successfully!");
    info!("  Customer: {}", order.user_email);
    info!("  Lines: {}", order.items.len());
    info!("  Total: {}", order.total.display());
    Ok(())
}
