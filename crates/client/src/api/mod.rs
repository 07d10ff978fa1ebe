//! HTTP clients for the storefront REST API.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; the server is the source of truth
//! - Browse results are cached in-memory via `moka` (5 minute TTL)
//! - The checkout client sits behind the [`CheckoutApi`] trait so the cart
//!   store can be tested against a scripted double
//!
//! Wire field names follow the server's existing contract (`BookID`,
//! `Price`, `userID`, `cartItems`, ...) via serde renames; the Rust API
//! uses snake_case throughout.

pub mod catalog;
pub mod checkout;

pub use catalog::{Book, BookPage, CatalogClient, CatalogError, OrderDetails, OrderLine};
pub use checkout::{
    CheckoutApi, CheckoutClient, CheckoutError, CheckoutItem, CheckoutRequest,
};
