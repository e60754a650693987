//! Integration tests for the checkout hand-off.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cloudmart_cart::{CartStore, CheckoutError, FileStore, SubmitError, place_order};
use cloudmart_core::{Email, OrderStatus};
use cloudmart_integration_tests::{FakeOrderService, file_cart, product};

fn shopper() -> Email {
    Email::parse("shopper@example.com").unwrap()
}

#[tokio::test]
async fn test_successful_order_clears_persisted_cart() {
    let (dir, store) = file_cart();
    store.add_item(&product(1, "10")).unwrap();
    store.add_item(&product(2, "5")).unwrap();
    store.add_item(&product(1, "10")).unwrap();

    let cleared = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cleared);
    let _sub = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let service = FakeOrderService::default();
    let order = place_order(&store, &service, Some(&shopper())).await.unwrap();

    assert_eq!(service.accepted(), 1);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.user_email, shopper());
    assert_eq!(order.total.display(), "$25.00");
    assert_eq!(cleared.load(Ordering::SeqCst), 1);

    let reloaded = CartStore::new(FileStore::new(dir.path()));
    assert!(reloaded.items().is_empty());
}

#[tokio::test]
async fn test_refused_order_keeps_persisted_cart() {
    let (dir, store) = file_cart();
    store.add_item(&product(7, "3.33")).unwrap();

    let service = FakeOrderService::refusing();
    let result = place_order(&store, &service, Some(&shopper())).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Submit(SubmitError::Api { status: 503, .. }))
    ));
    let reloaded = CartStore::new(FileStore::new(dir.path()));
    assert_eq!(reloaded.item_count(), 1);
    assert_eq!(reloaded.total().display(), "$3.33");
}

#[tokio::test]
async fn test_guest_cannot_order() {
    let (_dir, store) = file_cart();
    store.add_item(&product(1, "1")).unwrap();
    let service = FakeOrderService::default();

    let result = place_order(&store, &service, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CheckoutError::NotLoggedIn));
    assert_eq!(err.to_string(), "Please log in to complete your order.");
    assert_eq!(service.accepted(), 0);
}

#[tokio::test]
async fn test_order_payload_snapshots_cart() {
    let (_dir, store) = file_cart();
    store.add_item(&product(4, "1.10")).unwrap();
    store.update_quantity(cloudmart_core::ProductId::new(4), 3).unwrap();

    let service = FakeOrderService::default();
    place_order(&store, &service, Some(&shopper())).await.unwrap();

    let orders = service.orders.lock().unwrap();
    let line = &orders[0].items[0];
    assert_eq!(line.product_id.as_i64(), 4);
    assert_eq!(line.name, "Product 4");
    assert_eq!(line.quantity, 3);
    assert_eq!(orders[0].total.display(), "$3.30");
}
