//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults point at the public demo
//! catalog and a local data directory.
//!
//! - `TRIVAN_CATALOG_URL` - Catalog endpoint returning a JSON product array
//!   (default: `https://fakestoreapi.com/products`)
//! - `TRIVAN_CATALOG_TIMEOUT_SECS` - Catalog fetch timeout in seconds
//!   (default: 10)
//! - `TRIVAN_DATA_DIR` - Directory for the persisted key-value store
//!   (default: `.trivan`)
//! - `TRIVAN_CURRENCY` - ISO 4217 display currency: USD, EUR, GBP, CAD, AUD
//!   (default: USD)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use trivan_core::CurrencyCode;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".trivan";

/// Delay before the cart panel hides after the last item is removed,
/// leaving room for an exit animation.
pub const EMPTY_CART_HIDE_DELAY: Duration = Duration::from_millis(500);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Catalog endpoint URL.
    pub catalog_url: Url,
    /// Timeout applied to the catalog fetch.
    pub catalog_timeout: Duration,
    /// Directory holding the persisted key-value store.
    pub data_dir: PathBuf,
    /// Display currency for formatted prices.
    pub currency: CurrencyCode,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = parse_catalog_url(&get_env_or_default(
            "TRIVAN_CATALOG_URL",
            DEFAULT_CATALOG_URL,
        ))?;

        let timeout_secs = get_env_or_default(
            "TRIVAN_CATALOG_TIMEOUT_SECS",
            &DEFAULT_CATALOG_TIMEOUT_SECS.to_string(),
        );
        let timeout_secs = timeout_secs.parse::<u64>().map_err(|e| {
            ConfigError::InvalidEnvVar("TRIVAN_CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let data_dir = PathBuf::from(get_env_or_default("TRIVAN_DATA_DIR", DEFAULT_DATA_DIR));

        let currency = parse_currency(&get_env_or_default("TRIVAN_CURRENCY", "USD"))?;

        Ok(Self {
            catalog_url,
            catalog_timeout: Duration::from_secs(timeout_secs),
            data_dir,
            currency,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            // The default URL is a compile-time constant and always parses.
            catalog_url: Url::parse(DEFAULT_CATALOG_URL)
                .unwrap_or_else(|_| unreachable!("default catalog URL is valid")),
            catalog_timeout: Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            currency: CurrencyCode::USD,
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the catalog URL.
fn parse_catalog_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("TRIVAN_CATALOG_URL".to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            "TRIVAN_CATALOG_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an ISO 4217 currency code.
fn parse_currency(value: &str) -> Result<CurrencyCode, ConfigError> {
    match value.to_ascii_uppercase().as_str() {
        "USD" => Ok(CurrencyCode::USD),
        "EUR" => Ok(CurrencyCode::EUR),
        "GBP" => Ok(CurrencyCode::GBP),
        "CAD" => Ok(CurrencyCode::CAD),
        "AUD" => Ok(CurrencyCode::AUD),
        other => Err(ConfigError::InvalidEnvVar(
            "TRIVAN_CURRENCY".to_string(),
            format!("unknown currency '{other}'"),
        )),
    }
}
