//! CloudMart Cart - client-side cart subsystem.
//!
//! The [`CartStore`] is the sole authority over cart contents. Every read and
//! mutation goes through it so persistence and change notification stay
//! consistent:
//!
//! 1. read the persisted line items from a [`KeyValueStore`]
//! 2. apply the mutation
//! 3. write the full sequence back under one fixed key (last writer wins)
//! 4. notify every subscribed observer, with no payload
//!
//! # Modules
//!
//! - [`item`] - Line items and the product description they are built from
//! - [`storage`] - Key-value storage seam with memory and file backends
//! - [`observer`] - Change notification registry and disposers
//! - [`store`] - The cart store itself
//! - [`checkout`] - Turning the cart into an order and handing it off
//!
//! # Example
//!
//! ```rust
//! use cloudmart_cart::{CartStore, MemoryStore, Product};
//! use cloudmart_core::{Price, ProductId};
//!
//! let store = CartStore::new(MemoryStore::new());
//! let product = Product::new(ProductId::new(1), "Mug", "/mug.png", "12".parse::<Price>()?);
//!
//! store.add_item(&product)?;
//! store.add_item(&product)?;
//!
//! assert_eq!(store.item_count(), 2);
//! assert_eq!(store.total().display(), "$24.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod error;
pub mod item;
pub mod observer;
pub mod storage;
pub mod store;

pub use checkout::{
    CheckoutError, HttpOrderSubmitter, OrderDraft, OrderLine, OrderSubmitter, SubmitError,
    place_order,
};
pub use error::CartError;
pub use item::{CartLineItem, Product};
pub use observer::{Observers, Subscription};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CART_KEY, CartLoad, CartStore};
