//! Bookstand Core - Shared types library.
//!
//! This crate provides common types used across all Bookstand components:
//! - `client` - Storefront client core (cart, storage, remote API clients)
//! - `integration-tests` - End-to-end tests of the cart lifecycle
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
