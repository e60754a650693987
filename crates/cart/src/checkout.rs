//! Checkout hand-off.
//!
//! Turns the current cart into an [`OrderDraft`], hands it to an
//! [`OrderSubmitter`], and clears the cart once the order is accepted. The
//! cart is read before the submit call and only cleared after it succeeds; a
//! failed submission leaves it exactly as it was.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use cloudmart_core::{Email, OrderStatus, Price, ProductId};

use crate::error::CartError;
use crate::item::CartLineItem;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

/// Request timeout for order submission.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the order-creation endpoint.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The configured API base cannot be turned into an orders URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Submission refused for another reason.
    #[error("Order rejected: {0}")]
    Rejected(String),
}

/// Errors from [`place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No signed-in user to attach the order to.
    #[error("Please log in to complete your order.")]
    NotLoggedIn,

    /// Nothing to order.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// The order endpoint failed; the cart was left untouched.
    #[error("Failed to create order: {0}")]
    Submit(#[from] SubmitError),

    /// The order went through but the cart could not be cleared.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.id,
            name: item.name.clone(),
            quantity: item.quantity.get(),
            price: item.price,
        }
    }
}

/// Order payload sent to the order-creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub user_email: Email,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Build a pending order from cart lines.
    #[must_use]
    pub fn from_items(user_email: Email, items: &[CartLineItem], created_at: DateTime<Utc>) -> Self {
        Self {
            user_email,
            status: OrderStatus::Pending,
            items: items.iter().map(OrderLine::from).collect(),
            total: items.iter().map(CartLineItem::line_total).sum(),
            created_at,
        }
    }
}

/// Something that accepts orders.
pub trait OrderSubmitter {
    /// Submit `order`. Success means the order was created.
    fn submit(&self, order: &OrderDraft) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Posts orders as JSON to `<api base>/orders`.
#[derive(Debug, Clone)]
pub struct HttpOrderSubmitter {
    client: reqwest::Client,
    orders_url: Url,
}

impl HttpOrderSubmitter {
    /// Create a submitter for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns error if the orders URL cannot be built or the HTTP client
    /// fails to build.
    pub fn new(api_base: &Url) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder().timeout(SUBMIT_TIMEOUT).build()?;
        Ok(Self {
            client,
            orders_url: orders_url(api_base)?,
        })
    }

    /// The endpoint orders are posted to.
    #[must_use]
    pub const fn orders_url(&self) -> &Url {
        &self.orders_url
    }
}

impl OrderSubmitter for HttpOrderSubmitter {
    async fn submit(&self, order: &OrderDraft) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmitError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// `<api base>/orders`, keeping any path prefix on the base.
fn orders_url(api_base: &Url) -> Result<Url, url::ParseError> {
    let mut base = api_base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("orders")
}

/// Place an order for everything in the cart.
///
/// On success the cart is cleared (which notifies observers) and the
/// submitted draft is returned.
///
/// # Errors
///
/// - [`CheckoutError::NotLoggedIn`] if `user_email` is `None`
/// - [`CheckoutError::EmptyCart`] if there is nothing to order
/// - [`CheckoutError::Submit`] if the submitter fails; the cart is unchanged
/// - [`CheckoutError::Cart`] if the cart cannot be cleared afterwards
#[instrument(skip(store, submitter, user_email))]
pub async fn place_order<S, O>(
    store: &CartStore<S>,
    submitter: &O,
    user_email: Option<&Email>,
) -> Result<OrderDraft, CheckoutError>
where
    S: KeyValueStore,
    O: OrderSubmitter,
{
    let user_email = user_email.ok_or(CheckoutError::NotLoggedIn)?;

    let items = store.items();
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let draft = OrderDraft::from_items(user_email.clone(), &items, Utc::now());

    if let Err(e) = submitter.submit(&draft).await {
        warn!(error = %e, "Order submission failed, keeping cart");
        return Err(e.into());
    }

    store.clear()?;
    info!(
        lines = draft.items.len(),
        total = %draft.total,
        "Order placed, cart cleared"
    );

    Ok(draft)
}
