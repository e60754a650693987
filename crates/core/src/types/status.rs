//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Order status as stored by the order service.
///
/// Serialized in PascalCase. Orders placed from the cart always start out as
/// [`OrderStatus::Pending`]; later transitions belong to the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"Pending\"");
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"Pending\"").unwrap(),
            OrderStatus::Pending
        );
        assert!(serde_json::from_str::<OrderStatus>("\"pending\"").is_err());
    }
}
