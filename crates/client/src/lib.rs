//! Bookstand storefront client core.
//!
//! This crate is the headless core of the Bookstand mobile storefront: the
//! locally persisted shopping cart with its selection and checkout logic,
//! the key-value storage it persists into, and the HTTP clients for the
//! storefront REST API. Screens and rendering live elsewhere and call into
//! this crate; nothing here depends on a UI framework.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod state;
pub mod storage;

pub use cart::CartStore;
pub use state::AppState;
