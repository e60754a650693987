//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cloudmart cart add --id 1 --name "Tea" --image /tea.png --price 10
//! cloudmart cart set 1 3
//! cloudmart cart list
//! cloudmart cart remove 1
//! cloudmart cart clear
//! ```

use cloudmart_cart::{CartError, CartStore, KeyValueStore, Product, Subscription};
use cloudmart_core::{Price, ProductId};
use tracing::info;

/// Report every cart change the way the header badge would: re-read the count.
#[must_use = "the badge stops updating when the subscription is dropped"]
pub fn badge<S>(store: &CartStore<S>) -> Subscription
where
    S: KeyValueStore + Clone + Send + Sync + 'static,
{
    let reader = CartStore::with_key(store.storage().clone(), store.key());
    store.subscribe(move || {
        info!(count = reader.item_count(), "Cart updated");
    })
}

/// Log every line plus the derived count and total.
pub fn list<S: KeyValueStore>(store: &CartStore<S>) {
    let items = store.items();
    if items.is_empty() {
        info!("Your cart is empty.");
        return;
    }

    for item in &items {
        info!(
            "{:>6}  {:<30} {:>4} x {:>10} = {:>10}",
            item.id.as_i64(),
            item.name,
            item.quantity,
            item.price.display(),
            item.line_total().display()
        );
    }
    info!(
        "{} item(s), total {}",
        store.item_count(),
        store.total().display()
    );
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn add<S: KeyValueStore>(
    store: &CartStore<S>,
    id: ProductId,
    name: String,
    image: String,
    price: Price,
    description: Option<String>,
) -> Result<(), CartError> {
    let product =
        Product::new(id, name, image, price).with_description(description.unwrap_or_default());
    store.add_item(&product)
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn remove<S: KeyValueStore>(store: &CartStore<S>, id: ProductId) -> Result<(), CartError> {
    store.remove_item(id)
}

/// Set a product's quantity. Quantities below 1 are ignored.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn set_quantity<S: KeyValueStore>(
    store: &CartStore<S>,
    id: ProductId,
    quantity: i64,
) -> Result<(), CartError> {
    if quantity < 1 {
        info!(quantity, "Quantity must be at least 1, ignoring");
    }
    store.update_quantity(id, quantity)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn clear<S: KeyValueStore>(store: &CartStore<S>) -> Result<(), CartError> {
    store.clear()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cloudmart_cart::FileStore;
    use tempfile::TempDir;

    #[test]
    fn test_commands_share_file_state() {
        let dir = TempDir::new().unwrap();
        let first = CartStore::new(FileStore::new(dir.path()));
        add(
            &first,
            ProductId::new(1),
            "Tea".to_string(),
            "/tea.png".to_string(),
            "10".parse().unwrap(),
            Some("Green".to_string()),
        )
        .unwrap();

        // A later invocation opens the same directory.
        let second = CartStore::new(FileStore::new(dir.path()));
        set_quantity(&second, ProductId::new(1), 3).unwrap();
        set_quantity(&second, ProductId::new(1), 0).unwrap();

        assert_eq!(second.item_count(), 3);
        assert_eq!(second.items()[0].description, "Green");

        remove(&second, ProductId::new(1)).unwrap();
        assert!(first.items().is_empty());
    }

    #[test]
    fn test_badge_tracks_changes() {
        let dir = TempDir::new().unwrap();
        let store = CartStore::new(FileStore::new(dir.path()));
        let sub = badge(&store);
        assert_eq!(store.observers().len(), 1);

        clear(&store).unwrap();
        list(&store);
        drop(sub);
        assert!(store.observers().is_empty());
    }
}
