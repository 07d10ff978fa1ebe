//! The locally persisted shopping cart.
//!
//! [`CartStore`] is the single source of truth for the cart on this device:
//! an in-memory authoritative copy guarded by an async mutex, written
//! through to the storage collaborator after every mutation. The selection
//! (which lines participate in totals and checkout) is transient and never
//! persisted.
//!
//! All mutation goes through the operation set here so the invariants hold:
//! at most one line per book, quantities never below 1, selection always a
//! subset of the cart's ids.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

use bookstand_core::{BookId, OrderStatus, Price, UserId};

use crate::api::catalog::Book;
use crate::api::checkout::{CheckoutApi, CheckoutError, CheckoutItem, CheckoutRequest};
use crate::storage::CartStorage;

/// Storage key for the persisted cart snapshot.
const CART_KEY: &str = "cart";

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub book_id: BookId,
    pub title: String,
    pub cover_image_url: String,
    pub unit_price: Price,
    /// Always at least 1; decrementing at 1 is a no-op.
    pub quantity: u32,
}

impl LineItem {
    /// Build a cart line from a catalog book at its list price.
    #[must_use]
    pub fn from_book(book: &Book, quantity: u32) -> Self {
        Self {
            book_id: book.book_id,
            title: book.title.clone(),
            cover_image_url: book.cover_image_url.clone(),
            unit_price: book.price,
            quantity,
        }
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Errors surfaced by cart operations.
///
/// None of these are fatal; persistence read problems are recovered as an
/// empty cart and write problems are logged, not raised.
#[derive(Debug, Error)]
pub enum CartError {
    /// `add` called with a zero quantity.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Checkout invoked with nothing selected.
    #[error("no items selected for checkout")]
    EmptySelection,

    /// Another checkout for this cart has not finished yet.
    #[error("a checkout is already in flight")]
    CheckoutInFlight,

    /// The remote checkout call failed; cart and selection are untouched.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Returned after the server confirms a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfirmation {
    /// Total submitted with the order.
    pub total: Price,
    /// Number of lines evicted from the cart.
    pub items_submitted: usize,
}

#[derive(Debug, Default)]
struct CartState {
    items: Vec<LineItem>,
    selection: HashSet<BookId>,
}

impl CartState {
    fn selected_total(&self) -> Price {
        self.items
            .iter()
            .filter(|item| self.selection.contains(&item.book_id))
            .map(LineItem::line_total)
            .sum()
    }
}

/// Owner of the persisted cart and the transient selection.
///
/// Cheaply cloneable; clones share the same state. Every read-modify-write
/// runs under one async mutex, so rapid mutations serialize instead of
/// racing on the stored snapshot. Display reads come from the in-memory
/// copy; storage is only re-read on [`CartStore::load`].
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn CartStorage>,
    checkout: Arc<dyn CheckoutApi>,
    state: Mutex<CartState>,
    checkout_in_flight: AtomicBool,
}

impl CartStore {
    /// Create a cart store over the given collaborators.
    ///
    /// The cart starts empty; call [`CartStore::load`] to pick up the
    /// persisted snapshot.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, checkout: Arc<dyn CheckoutApi>) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                checkout,
                state: Mutex::new(CartState::default()),
                checkout_in_flight: AtomicBool::new(false),
            }),
        }
    }

    /// Replace the in-memory cart with the persisted snapshot.
    ///
    /// An absent or unparsable snapshot loads as an empty cart; this never
    /// fails. The selection is session-scoped and resets on every load.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Vec<LineItem> {
        let items = match self.inner.storage.get(CART_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<LineItem>>(&blob) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt cart snapshot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart snapshot, starting empty");
                Vec::new()
            }
        };

        let mut state = self.inner.state.lock().await;
        state.items = items.clone();
        state.selection.clear();
        items
    }

    /// Snapshot of the current cart lines, in insertion order.
    pub async fn items(&self) -> Vec<LineItem> {
        self.inner.state.lock().await.items.clone()
    }

    /// Snapshot of the currently selected ids.
    pub async fn selection(&self) -> HashSet<BookId> {
        self.inner.state.lock().await.selection.clone()
    }

    /// Whether every line in a non-empty cart is selected.
    pub async fn all_selected(&self) -> bool {
        let state = self.inner.state.lock().await;
        !state.items.is_empty() && state.selection.len() == state.items.len()
    }

    /// Add a line to the cart, merging by book id.
    ///
    /// If the book is already present its quantity grows by
    /// `item.quantity`; otherwise the line is appended, preserving arrival
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `item.quantity` is 0; the
    /// cart is not touched.
    #[instrument(skip(self, item), fields(book_id = %item.book_id, quantity = item.quantity))]
    pub async fn add(&self, item: LineItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut state = self.inner.state.lock().await;
        if let Some(existing) = state
            .items
            .iter_mut()
            .find(|existing| existing.book_id == item.book_id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            state.items.push(item);
        }
        self.persist(&state).await;
        Ok(())
    }

    /// Remove a line from the cart and from the selection.
    ///
    /// No-op if the book is not in the cart.
    #[instrument(skip(self))]
    pub async fn remove(&self, book_id: BookId) {
        let mut state = self.inner.state.lock().await;
        let before = state.items.len();
        state.items.retain(|item| item.book_id != book_id);
        if state.items.len() != before {
            state.selection.remove(&book_id);
            self.persist(&state).await;
        }
    }

    /// Increase a line's quantity by 1. No-op if the book is absent.
    #[instrument(skip(self))]
    pub async fn increment(&self, book_id: BookId) {
        let mut state = self.inner.state.lock().await;
        if let Some(item) = state.items.iter_mut().find(|item| item.book_id == book_id) {
            item.quantity = item.quantity.saturating_add(1);
            self.persist(&state).await;
        }
    }

    /// Decrease a line's quantity by 1, flooring at 1.
    ///
    /// Decrementing at quantity 1 is a no-op, never an implicit removal.
    /// No-op if the book is absent.
    #[instrument(skip(self))]
    pub async fn decrement(&self, book_id: BookId) {
        let mut state = self.inner.state.lock().await;
        if let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.book_id == book_id && item.quantity > 1)
        {
            item.quantity -= 1;
            self.persist(&state).await;
        }
    }

    /// Flip a line's membership in the selection.
    ///
    /// No-op for ids not in the cart, so the selection stays a subset of
    /// the cart's ids.
    pub async fn toggle_select(&self, book_id: BookId) {
        let mut state = self.inner.state.lock().await;
        if !state.items.iter().any(|item| item.book_id == book_id) {
            return;
        }
        if !state.selection.remove(&book_id) {
            state.selection.insert(book_id);
        }
    }

    /// Select every line currently in the cart.
    pub async fn select_all(&self) {
        let mut state = self.inner.state.lock().await;
        state.selection = state.items.iter().map(|item| item.book_id).collect();
    }

    /// Empty the selection.
    pub async fn clear_selection(&self) {
        self.inner.state.lock().await.selection.clear();
    }

    /// Sum of `unit_price * quantity` over the selected lines.
    ///
    /// Zero when nothing is selected.
    pub async fn selected_total(&self) -> Price {
        self.inner.state.lock().await.selected_total()
    }

    /// Submit the selected lines as an order.
    ///
    /// Builds an immutable [`CheckoutRequest`] snapshot, submits it exactly
    /// once, and only on confirmed success evicts the submitted lines from
    /// the cart and selection and persists the reduced cart. On rejection
    /// or transport failure, cart and selection are left exactly as they
    /// were; the caller retries explicitly.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptySelection`] if nothing is selected
    /// - [`CartError::CheckoutInFlight`] if another checkout has not finished
    /// - [`CartError::Checkout`] if the remote call fails
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn checkout(
        &self,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<CheckoutConfirmation, CartError> {
        // At most one checkout in flight per store.
        if self
            .inner
            .checkout_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CartError::CheckoutInFlight);
        }
        let _guard = InFlightGuard(&self.inner.checkout_in_flight);

        let request = {
            let state = self.inner.state.lock().await;
            let items: Vec<CheckoutItem> = state
                .items
                .iter()
                .filter(|item| state.selection.contains(&item.book_id))
                .map(|item| CheckoutItem {
                    book_id: item.book_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect();

            if items.is_empty() {
                return Err(CartError::EmptySelection);
            }

            CheckoutRequest {
                user_id,
                total: state.selected_total(),
                status,
                items,
            }
        };

        // The state lock is not held across the network call; the request
        // snapshot is immutable from here on.
        self.inner.checkout.submit(&request).await?;

        let mut state = self.inner.state.lock().await;
        let submitted: HashSet<BookId> = request.items.iter().map(|item| item.book_id).collect();
        state.items.retain(|item| !submitted.contains(&item.book_id));
        state.selection.retain(|id| !submitted.contains(id));
        self.persist(&state).await;

        Ok(CheckoutConfirmation {
            total: request.total,
            items_submitted: request.items.len(),
        })
    }

    /// Write the snapshot through to storage.
    ///
    /// A failed write is logged and swallowed: the in-memory cart stays
    /// authoritative for this session, the next cold start may not see the
    /// mutation.
    async fn persist(&self, state: &CartState) {
        let blob = match serde_json::to_string(&state.items) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set(CART_KEY, &blob).await {
            tracing::warn!(error = %e, "failed to persist cart snapshot");
        }
    }
}

/// Clears the in-flight flag when a checkout attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
