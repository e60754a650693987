//! The cart store.
//!
//! [`CartStore`] owns the line items persisted under one key of a
//! [`KeyValueStore`]. Each mutation is a strict read, modify, persist, notify
//! sequence within a single call. Nothing is cached between calls: every read
//! goes back to storage, so two stores sharing a backend see each other's
//! writes (last writer wins, no merge).

use std::num::NonZeroU32;

use tracing::{debug, instrument, warn};

use cloudmart_core::{Price, ProductId};

use crate::error::Result;
use crate::item::{CartLineItem, Product};
use crate::observer::{Observers, Subscription};
use crate::storage::KeyValueStore;

/// Default storage key for the cart.
pub const CART_KEY: &str = "cloudmart_cart";

/// Outcome of reading the persisted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartLoad {
    /// Nothing stored under the key (or an empty value).
    Missing,
    /// Parsed line items, in stored order.
    Loaded(Vec<CartLineItem>),
    /// A value is stored but is not a valid cart.
    Corrupt {
        /// The stored value, untouched.
        raw: String,
        /// Why it failed to parse.
        reason: String,
    },
}

impl CartLoad {
    /// The line items, treating missing and corrupt data as an empty cart.
    #[must_use]
    pub fn into_items(self) -> Vec<CartLineItem> {
        match self {
            Self::Loaded(items) => items,
            Self::Missing | Self::Corrupt { .. } => Vec::new(),
        }
    }
}

/// Cart store over a key-value backend.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    observers: Observers,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store persisting under [`CART_KEY`].
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_KEY)
    }

    /// Create a store persisting under `key`.
    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            observers: Observers::new(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted cart, reporting corruption instead of hiding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load(&self) -> Result<CartLoad> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(CartLoad::Missing);
        };
        if raw.trim().is_empty() {
            return Ok(CartLoad::Missing);
        }

        Ok(match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
            Ok(items) => CartLoad::Loaded(items),
            Err(e) => CartLoad::Corrupt {
                raw,
                reason: e.to_string(),
            },
        })
    }

    /// Current line items in insertion order.
    ///
    /// Missing, corrupt, or unreadable data all yield an empty cart.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        match self.load() {
            Ok(CartLoad::Corrupt { reason, .. }) => {
                warn!(key = %self.key, %reason, "Persisted cart is corrupt, treating as empty");
                Vec::new()
            }
            Ok(load) => load.into_items(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cart, treating as empty");
                Vec::new()
            }
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the quantity if a line with the same id exists, otherwise
    /// appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: &Product) -> Result<()> {
        let mut items = self.items();

        if let Some(item) = items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            debug!(quantity = item.quantity.get(), "Incremented cart line");
        } else {
            items.push(CartLineItem::from_product(product));
            debug!("Appended cart line");
        }

        self.save(&items)
    }

    /// Remove the line for `id`. Absent ids leave the contents unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: ProductId) -> Result<()> {
        let mut items = self.items();
        let before = items.len();
        items.retain(|item| item.id != id);
        debug!(removed = before - items.len(), "Removed cart line");

        self.save(&items)
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Quantities below 1 are ignored, as are unknown ids. Nothing is
    /// persisted and nobody is notified in either case.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<()> {
        let Some(quantity) = u32::try_from(quantity).ok().and_then(NonZeroU32::new) else {
            debug!("Ignoring out-of-range quantity");
            return Ok(());
        };

        let mut items = self.items();
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            debug!("No cart line for product");
            return Ok(());
        };
        item.quantity = quantity;

        self.save(&items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items()
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of `price * quantity` across all lines, unrounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items().iter().map(CartLineItem::line_total).sum()
    }

    /// Register a change observer. Dropping the returned handle unsubscribes.
    #[must_use = "dropping the subscription unregisters the observer immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// The observer registry, for sharing with views that only listen.
    #[must_use]
    pub const fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Persist the full sequence, then notify.
    fn save(&self, items: &[CartLineItem]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, lines = items.len(), "Persisted cart");

        self.observers.notify();
        Ok(())
    }
}
