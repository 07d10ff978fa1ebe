//! Integration tests for Bookstand.
//!
//! Exercises the cart lifecycle end to end: real file storage under a
//! temporary directory, simulated process restarts, and a scripted remote
//! checkout collaborator. No network access is required.
//!
//! Run with: `cargo test -p bookstand-integration-tests`

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use bookstand_client::api::checkout::{CheckoutApi, CheckoutError, CheckoutRequest};
use bookstand_client::cart::LineItem;
use bookstand_core::{BookId, Price};

/// Scripted checkout collaborator.
///
/// Succeeds or fails on demand and records every submitted request.
#[derive(Default)]
pub struct ScriptedCheckout {
    fail: AtomicBool,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl ScriptedCheckout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent submissions fail with a rejection.
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every request submitted so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CheckoutApi for ScriptedCheckout {
    async fn submit(&self, request: &CheckoutRequest) -> Result<(), CheckoutError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(CheckoutError::Rejected {
                status: 500,
                message: "Checkout failed".to_string(),
            });
        }
        Ok(())
    }
}

/// Build a cart line for tests.
#[must_use]
pub fn line(id: i32, price: u32, quantity: u32) -> LineItem {
    LineItem {
        book_id: BookId::new(id),
        title: format!("Book {id}"),
        cover_image_url: format!("book-{id}.jpg"),
        unit_price: Price::from(price),
        quantity,
    }
}

/// Initialize test logging once per process.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
