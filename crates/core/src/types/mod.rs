//! Core types for Bookstand.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{NegativePrice, Price};
pub use status::OrderStatus;
