//! Application state shared across screens.

use std::sync::Arc;

use thiserror::Error;

use crate::api::catalog::CatalogClient;
use crate::api::checkout::{CheckoutClient, CheckoutError};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::storage::FileStorage;

/// Error building the application state.
#[derive(Debug, Error)]
pub enum AppStateError {
    #[error("failed to build checkout client: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Application state shared by every screen.
///
/// Cheaply cloneable via `Arc`; screens receive a clone and call into the
/// cart store and API clients through it. The cart store is the single
/// owner of cart state for the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    catalog: CatalogClient,
    cart: CartStore,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Wires the cart store to file storage under the configured data
    /// directory and to the HTTP checkout client.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, AppStateError> {
        let catalog = CatalogClient::new(&config);
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        let checkout = Arc::new(CheckoutClient::new(&config)?);
        let cart = CartStore::new(storage, checkout);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
