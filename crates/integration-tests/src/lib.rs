//! Integration tests for CloudMart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cloudmart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - File-backed round trips and the persisted layout
//! - `cart_views` - Catalog, badge, and cart views sharing one injected store
//! - `checkout` - Order hand-off and cart clearing
//!
//! This library holds the fixtures the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use cloudmart_cart::{CartStore, FileStore, OrderDraft, OrderSubmitter, Product, SubmitError};
use cloudmart_core::{Price, ProductId};
use tempfile::TempDir;

/// A product with a generated name and image.
///
/// # Panics
///
/// Panics if `price` is not a valid non-negative decimal.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: i64, price: &str) -> Product {
    Product::new(
        ProductId::new(id),
        format!("Product {id}"),
        format!("https://cdn.example.com/{id}.jpg"),
        price.parse::<Price>().expect("fixture price must be valid"),
    )
    .with_description(format!("Description of product {id}"))
}

/// A file-backed cart in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_cart() -> (TempDir, CartStore<FileStore>) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = CartStore::new(FileStore::new(dir.path()));
    (dir, store)
}

/// Order submitter that records orders, or refuses them all.
#[derive(Debug, Default)]
pub struct FakeOrderService {
    pub orders: Mutex<Vec<OrderDraft>>,
    pub refuse: bool,
}

impl FakeOrderService {
    /// A service that refuses every order.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            orders: Mutex::default(),
            refuse: true,
        }
    }

    /// Number of accepted orders.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.orders.lock().map_or(0, |orders| orders.len())
    }
}

impl OrderSubmitter for FakeOrderService {
    async fn submit(&self, order: &OrderDraft) -> Result<(), SubmitError> {
        if self.refuse {
            return Err(SubmitError::Api {
                status: 503,
                message: "order service unavailable".to_string(),
            });
        }
        self.orders
            .lock()
            .map_err(|_| SubmitError::Rejected("order log poisoned".to_string()))?
            .push(order.clone());
        Ok(())
    }
}
