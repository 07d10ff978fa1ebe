//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BOOKSTAND_API_URL` - Base URL of the storefront REST API
//! - `BOOKSTAND_IMAGES_URL` - Base URL for cover image assets
//!
//! ## Optional
//! - `BOOKSTAND_DATA_DIR` - Directory for persisted client state (default: ./data)
//! - `BOOKSTAND_CHECKOUT_TIMEOUT_SECS` - Checkout request timeout (default: 10)
//! - `BOOKSTAND_PAGE_SIZE` - Default catalog page size (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront REST API
    pub api_url: Url,
    /// Base URL for cover image assets
    pub images_url: Url,
    /// Directory holding persisted client state (the cart snapshot)
    pub data_dir: PathBuf,
    /// Timeout applied to the checkout request
    pub checkout_timeout: Duration,
    /// Default page size for catalog listings
    pub page_size: u32,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_url("BOOKSTAND_API_URL")?;
        let images_url = get_url("BOOKSTAND_IMAGES_URL")?;
        let data_dir = PathBuf::from(get_env_or_default("BOOKSTAND_DATA_DIR", "./data"));
        let checkout_timeout_secs = get_env_or_default("BOOKSTAND_CHECKOUT_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BOOKSTAND_CHECKOUT_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let page_size = get_env_or_default("BOOKSTAND_PAGE_SIZE", "10")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BOOKSTAND_PAGE_SIZE".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url,
            images_url,
            data_dir,
            checkout_timeout: Duration::from_secs(checkout_timeout_secs),
            page_size,
        })
    }

    /// The API base URL as a string without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.api_url.as_str().trim_end_matches('/').to_string()
    }

    /// The images base URL as a string without a trailing slash.
    #[must_use]
    pub fn images_base(&self) -> String {
        self.images_url.as_str().trim_end_matches('/').to_string()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default fallback.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as a URL.
fn get_url(key: &str) -> Result<Url, ConfigError> {
    get_required_env(key)?
        .parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_bases() {
        let config = ClientConfig {
            api_url: "http://192.168.1.110:3000/".parse().expect("url"),
            images_url: "http://192.168.1.110/img".parse().expect("url"),
            data_dir: PathBuf::from("./data"),
            checkout_timeout: Duration::from_secs(10),
            page_size: 10,
        };
        assert_eq!(config.api_base(), "http://192.168.1.110:3000");
        assert_eq!(config.images_base(), "http://192.168.1.110/img");
    }
}
