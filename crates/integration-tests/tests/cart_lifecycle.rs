//! End-to-end cart lifecycle over real file storage.
//!
//! Covers persistence across simulated restarts (a fresh `CartStore` over
//! the same data directory) and the checkout flow against a scripted
//! remote collaborator.

use std::sync::Arc;

use bookstand_client::cart::{CartError, CartStore};
use bookstand_client::storage::FileStorage;
use bookstand_core::{BookId, OrderStatus, Price, UserId};
use bookstand_integration_tests::{ScriptedCheckout, init_tracing, line};

fn store_in(dir: &std::path::Path, checkout: Arc<ScriptedCheckout>) -> CartStore {
    CartStore::new(Arc::new(FileStorage::new(dir)), checkout)
}

#[tokio::test]
async fn cart_survives_restart_with_items_quantities_and_order() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let checkout = Arc::new(ScriptedCheckout::new());

    let session = store_in(dir.path(), checkout.clone());
    session.add(line(3, 79_000, 1)).await.expect("add");
    session.add(line(1, 100_000, 2)).await.expect("add");
    session.add(line(3, 79_000, 2)).await.expect("merge");
    session.decrement(BookId::new(1)).await;

    // Restart: a fresh store over the same directory.
    let restarted = store_in(dir.path(), checkout);
    let items = restarted.load().await;

    let summary: Vec<(i32, u32)> = items
        .iter()
        .map(|item| (item.book_id.as_i32(), item.quantity))
        .collect();
    assert_eq!(summary, vec![(3, 3), (1, 1)]);
}

#[tokio::test]
async fn first_load_of_an_empty_directory_is_an_empty_cart() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(dir.path(), Arc::new(ScriptedCheckout::new()));
    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn checkout_round_trip_clears_cart_on_disk() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let checkout = Arc::new(ScriptedCheckout::new());

    let session = store_in(dir.path(), checkout.clone());
    session.add(line(1, 100_000, 2)).await.expect("add");
    session.add(line(2, 50_000, 1)).await.expect("add");
    session.select_all().await;
    assert_eq!(session.selected_total().await, Price::from(250_000));

    let confirmation = session
        .checkout(UserId::new(1), OrderStatus::Pending)
        .await
        .expect("checkout");
    assert_eq!(confirmation.total, Price::from(250_000));

    let requests = checkout.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests.first().map(|r| r.items.len()),
        Some(2),
        "both selected lines submitted"
    );

    // The emptied cart is durable.
    let restarted = store_in(dir.path(), checkout);
    assert!(restarted.load().await.is_empty());
}

#[tokio::test]
async fn rejected_checkout_leaves_the_persisted_cart_intact() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let checkout = Arc::new(ScriptedCheckout::new());
    checkout.fail_next(true);

    let session = store_in(dir.path(), checkout.clone());
    session.add(line(1, 100_000, 2)).await.expect("add");
    session.select_all().await;

    let err = session
        .checkout(UserId::new(1), OrderStatus::Pending)
        .await
        .expect_err("checkout must fail");
    assert!(matches!(err, CartError::Checkout(_)));

    // In-memory and on-disk state both keep the line.
    assert_eq!(session.items().await.len(), 1);
    let restarted = store_in(dir.path(), checkout);
    assert_eq!(restarted.load().await.len(), 1);
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let checkout = Arc::new(ScriptedCheckout::new());

    let session = store_in(dir.path(), checkout.clone());
    session.add(line(1, 100_000, 1)).await.expect("add");
    session.select_all().await;

    checkout.fail_next(true);
    session
        .checkout(UserId::new(1), OrderStatus::Pending)
        .await
        .expect_err("first attempt fails");

    // The caller retries explicitly; nothing was lost in between.
    checkout.fail_next(false);
    session
        .checkout(UserId::new(1), OrderStatus::Pending)
        .await
        .expect("retry succeeds");

    assert!(session.items().await.is_empty());
    assert_eq!(checkout.requests().len(), 2);
}
