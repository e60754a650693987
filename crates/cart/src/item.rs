//! Cart line items.
//!
//! A line item is a snapshot of the product taken when it was first added.
//! Later catalog changes (a new price, a new image) do not reach items already
//! sitting in the cart.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use cloudmart_core::{Price, ProductId};

/// Product description supplied by the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// Create a product with an empty description.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        image: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            image: image.into(),
            price,
            description: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One product and the quantity held in the cart.
///
/// This is also the persisted shape:
/// `{"id", "name", "image", "price", "description", "quantity"}`.
/// A stored quantity of zero fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// Snapshot a product into a new line item with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            description: product.description.clone(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// `price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mug() -> Product {
        Product::new(ProductId::new(1), "Mug", "/img/mug.png", "12.50".parse().unwrap())
            .with_description("Stoneware")
    }

    #[test]
    fn test_from_product_starts_at_one() {
        let item = CartLineItem::from_product(&mug());
        assert_eq!(item.quantity.get(), 1);
        assert_eq!(item.description, "Stoneware");
        assert_eq!(item.price, mug().price);
    }

    #[test]
    fn test_line_total() {
        let mut item = CartLineItem::from_product(&mug());
        item.quantity = NonZeroU32::new(3).unwrap();
        assert_eq!(item.line_total().display(), "$37.50");
    }

    #[test]
    fn test_persisted_shape() {
        let item = CartLineItem::from_product(&mug());
        let value = serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["description", "id", "image", "name", "price", "quantity"]
        );
        assert_eq!(object["id"], 1);
        assert_eq!(object["quantity"], 1);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let json = r#"{"id":1,"name":"Mug","image":"","price":1,"quantity":0}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_missing_description_defaults_empty() {
        let json = r#"{"id":1,"name":"Mug","image":"","price":1,"quantity":2}"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert!(item.description.is_empty());
        assert_eq!(item.quantity.get(), 2);
    }
}
