//! Checkout submission to the storefront API.
//!
//! A checkout is a single `POST /api/checkout` carrying the selected cart
//! lines and the precomputed total. Success is any 2xx response; every
//! other status is a rejection, and transport failures (including timeout)
//! are classified separately so callers can tell "the server said no" from
//! "the request never made it".

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::instrument;

use bookstand_core::{BookId, OrderStatus, Price, UserId};

use crate::config::ClientConfig;

/// Errors that can occur when submitting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request never completed: connection failure, DNS, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("checkout rejected: HTTP {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for CheckoutError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("request timed out".to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Serialize money as a JSON number on the wire.
///
/// `Price` defaults to decimal-string serialization (used for the
/// persisted cart snapshot); the server expects numeric `total` and
/// `Price` fields.
fn price_as_number<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&price.amount(), serializer)
}

/// One selected cart line as submitted to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutItem {
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    pub quantity: u32,
    #[serde(rename = "Price", serialize_with = "price_as_number")]
    pub unit_price: Price,
}

/// Immutable snapshot submitted once per checkout attempt.
///
/// Built by the cart store from the selected line items at the moment
/// checkout is invoked; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    #[serde(rename = "userID")]
    pub user_id: UserId,
    #[serde(serialize_with = "price_as_number")]
    pub total: Price,
    pub status: OrderStatus,
    #[serde(rename = "cartItems")]
    pub items: Vec<CheckoutItem>,
}

/// Remote checkout collaborator.
///
/// The cart store depends on this trait, not on HTTP, so tests substitute
/// scripted doubles.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Submit a checkout request.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`] for a non-2xx response and
    /// [`CheckoutError::Network`] for transport failures.
    async fn submit(&self, request: &CheckoutRequest) -> Result<(), CheckoutError>;
}

/// HTTP client for the checkout endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CheckoutClient {
    /// Create a new checkout client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder()
            .timeout(config.checkout_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/checkout", config.api_base()),
        })
    }
}

#[async_trait]
impl CheckoutApi for CheckoutClient {
    #[instrument(skip(self, request), fields(user_id = %request.user_id, items = request.items.len()))]
    async fn submit(&self, request: &CheckoutRequest) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_server_field_names() {
        let request = CheckoutRequest {
            user_id: UserId::new(1),
            total: Price::from(250_000),
            status: OrderStatus::Pending,
            items: vec![
                CheckoutItem {
                    book_id: BookId::new(1),
                    quantity: 2,
                    unit_price: Price::from(100_000),
                },
                CheckoutItem {
                    book_id: BookId::new(2),
                    quantity: 1,
                    unit_price: Price::from(50_000),
                },
            ],
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["userID"], 1);
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["cartItems"][0]["BookID"], 1);
        assert_eq!(value["cartItems"][0]["quantity"], 2);
        assert_eq!(value["cartItems"][1]["BookID"], 2);
        assert_eq!(value["cartItems"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn money_fields_serialize_as_json_numbers() {
        let request = CheckoutRequest {
            user_id: UserId::new(1),
            total: Price::from(250_000),
            status: OrderStatus::Pending,
            items: vec![CheckoutItem {
                book_id: BookId::new(1),
                quantity: 2,
                unit_price: Price::from(100_000),
            }],
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert!(value["total"].is_number(), "total must not be a string");
        assert!(
            value["cartItems"][0]["Price"].is_number(),
            "unit price must not be a string"
        );
        assert_eq!(value["total"], 250_000.0);
        assert_eq!(value["cartItems"][0]["Price"], 100_000.0);
    }
}
