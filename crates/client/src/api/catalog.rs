//! Catalog and order lookups against the storefront REST API.
//!
//! Read-only GET endpoints: paginated book listings, title search, and
//! order details. Browse pages are cached for 5 minutes; searches are not.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use bookstand_core::{BookId, OrderId, Price};

use crate::config::ClientConfig;

/// Errors that can occur when querying the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A book as returned by the catalog endpoints.
///
/// Field names on the wire follow the server contract (PascalCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "BookID")]
    pub book_id: BookId,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author", default)]
    pub author: Option<String>,
    #[serde(rename = "Publisher", default)]
    pub publisher: Option<String>,
    #[serde(rename = "Price")]
    pub price: Price,
    /// Discount as a percentage of the list price (0-100).
    #[serde(rename = "Discount", default)]
    pub discount_percent: Decimal,
    #[serde(rename = "CoverImageURL", default)]
    pub cover_image_url: String,
    #[serde(rename = "Stock", default)]
    pub stock: u32,
    #[serde(rename = "NumberOfPages", default)]
    pub number_of_pages: Option<u32>,
    #[serde(rename = "Size", default)]
    pub size: Option<String>,
    #[serde(rename = "PublishedDate", default)]
    pub published_date: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl Book {
    /// List price with the discount percentage applied.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        let amount = self.price.amount()
            - self.price.amount() * self.discount_percent / Decimal::from(100);
        Price::new(amount).unwrap_or(Price::ZERO)
    }

    /// Absolute URL of the cover image under the given images base URL.
    #[must_use]
    pub fn cover_url(&self, images_base: &str) -> String {
        format!("{images_base}/{}", self.cover_image_url)
    }
}

/// One page of a paginated book listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    #[serde(rename = "maxPage", default = "default_max_page")]
    pub max_page: u32,
}

const fn default_max_page() -> u32 {
    1
}

/// Order header plus line details from the order endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderDetails {
    #[serde(rename = "don_hang_id")]
    pub order_id: OrderId,
    #[serde(rename = "ten_khach_hang")]
    pub customer_name: String,
    #[serde(rename = "sdt")]
    pub phone: String,
    #[serde(rename = "dia_chi")]
    pub address: String,
    #[serde(rename = "thoi_gian_tao")]
    pub created_at: String,
    #[serde(rename = "tong_don_hang")]
    pub total: Price,
    #[serde(rename = "tinh_trang_don_hang")]
    pub status: String,
    #[serde(rename = "chi_tiet_don_hang", default)]
    pub lines: Vec<OrderLine>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    pub id: i32,
    #[serde(rename = "ten_sp")]
    pub product_name: String,
    #[serde(rename = "so_luong")]
    pub quantity: u32,
    #[serde(rename = "gia_ban")]
    pub unit_price: Price,
    #[serde(rename = "tong")]
    pub line_total: Price,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog and order endpoints.
///
/// Browse pages are cached for 5 minutes; the cart never goes through this
/// client.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base: String,
    images_base: String,
    cache: Cache<String, BookPage>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base: config.api_base(),
                images_base: config.images_base(),
                cache,
            }),
        }
    }

    /// Execute a GET request and parse the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e.to_string())
        })
    }

    /// Get one page of the book listing.
    ///
    /// Pages without a search query are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_books(
        &self,
        page_num: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> Result<BookPage, CatalogError> {
        let cache_key = format!("books:{page_num}:{page_size}");

        // Check cache (only for default queries without search)
        if query.is_none()
            && let Some(page) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for book page");
            return Ok(page);
        }

        let url = format!(
            "{}/api/books?pageNum={page_num}&pageSize={page_size}&query={}",
            self.inner.base,
            urlencoding::encode(query.unwrap_or_default()),
        );

        let page: BookPage = self.get_json(&url).await?;

        if query.is_none() {
            self.inner.cache.insert(cache_key, page.clone()).await;
        }

        Ok(page)
    }

    /// Search books by title. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(title = %title))]
    pub async fn search_books(
        &self,
        title: &str,
        page_num: u32,
        page_size: u32,
    ) -> Result<Vec<Book>, CatalogError> {
        let url = format!(
            "{}/api/books/search?title={}&pageNum={page_num}&pageSize={page_size}",
            self.inner.base,
            urlencoding::encode(title),
        );

        let page: BookPage = self.get_json(&url).await?;
        Ok(page.books)
    }

    /// Get the details of a single order.
    ///
    /// The server wraps the result in a one-element array; an empty array
    /// means the order does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_details(&self, order_id: OrderId) -> Result<OrderDetails, CatalogError> {
        let url = format!("{}/api/get-order-details/{order_id}", self.inner.base);

        let orders: Vec<OrderDetails> = self.get_json(&url).await?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(format!("Order not found: {order_id}")))
    }

    /// Absolute URL of a book's cover image.
    #[must_use]
    pub fn cover_url(&self, book: &Book) -> String {
        book.cover_url(&self.inner.images_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book_json() -> serde_json::Value {
        serde_json::json!({
            "BookID": 3,
            "Title": "Nhà Giả Kim",
            "Author": "Paulo Coelho",
            "Publisher": "NXB Văn Học",
            "Price": 79000,
            "Discount": 20,
            "CoverImageURL": "nha-gia-kim.jpg",
            "Stock": 12,
            "NumberOfPages": 224,
            "Size": "13 x 20.5 cm",
            "PublishedDate": "2020",
            "Description": "Tiểu thuyết"
        })
    }

    #[test]
    fn book_deserializes_from_server_payload() {
        let book: Book = serde_json::from_value(sample_book_json()).expect("deserialize");
        assert_eq!(book.book_id, BookId::new(3));
        assert_eq!(book.title, "Nhà Giả Kim");
        assert_eq!(book.price, Price::from(79_000));
        assert_eq!(book.stock, 12);
    }

    #[test]
    fn discounted_price_applies_percentage() {
        let book: Book = serde_json::from_value(sample_book_json()).expect("deserialize");
        // 79000 - 20% = 63200
        assert_eq!(book.discounted_price(), Price::from(63_200));
    }

    #[test]
    fn cover_url_joins_images_base() {
        let book: Book = serde_json::from_value(sample_book_json()).expect("deserialize");
        assert_eq!(
            book.cover_url("http://192.168.1.110/img"),
            "http://192.168.1.110/img/nha-gia-kim.jpg"
        );
    }

    #[test]
    fn book_page_defaults_max_page_when_absent() {
        let page: BookPage =
            serde_json::from_value(serde_json::json!({ "books": [] })).expect("deserialize");
        assert!(page.books.is_empty());
        assert_eq!(page.max_page, 1);
    }

    #[test]
    fn order_details_deserialize_from_server_payload() {
        let order: OrderDetails = serde_json::from_value(serde_json::json!({
            "don_hang_id": 9,
            "ten_khach_hang": "Nguyễn Văn A",
            "sdt": "0900000000",
            "dia_chi": "Hà Nội",
            "thoi_gian_tao": "2024-05-01 10:30:00",
            "tong_don_hang": 250000,
            "tinh_trang_don_hang": "Pending",
            "chi_tiet_don_hang": [
                { "id": 1, "ten_sp": "Nhà Giả Kim", "so_luong": 2, "gia_ban": 100000, "tong": 200000 }
            ]
        }))
        .expect("deserialize");

        assert_eq!(order.order_id, OrderId::new(9));
        assert_eq!(order.total, Price::from(250_000));
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines.first().map(|l| l.quantity), Some(2));
    }
}
