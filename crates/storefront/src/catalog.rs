//! Catalog HTTP client.
//!
//! Fetches the product catalog from a fixed external REST endpoint as a
//! JSON array of products. The only contract consumed is the
//! `{id, title, image, price}` schema; everything else the endpoint returns
//! is ignored.
//!
//! The fetch carries an explicit timeout, and failures are classified as
//! retryable or not so the UI can surface a retry affordance instead of a
//! permanently empty product list.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use trivan_core::{Catalog, Product};
use url::Url;

use crate::config::StoreConfig;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Request failed before a response arrived (connect, DNS, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetch exceeded the configured timeout.
    #[error("Catalog fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success status.
    #[error("Catalog endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a valid product array.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether retrying the fetch could plausibly succeed.
    ///
    /// Transport failures and server-side errors are transient; a parse
    /// failure means the endpoint's contract changed and retrying won't
    /// help.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status(status) => status.is_server_error() || status.as_u16() == 429,
            Self::Parse(_) => false,
        }
    }
}

/// Lifecycle of the catalog over a session.
///
/// Cart mutations never block on this state: a user can add an item while
/// the catalog is still `Loading`, and the resulting dangling reference is
/// skipped (and logged) by total/render until the catalog resolves.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// The fetch has not completed yet.
    #[default]
    Loading,
    /// The catalog is available for lookups.
    Ready(Catalog),
    /// The fetch failed; `retryable` says whether retrying makes sense.
    Failed { message: String, retryable: bool },
}

impl CatalogState {
    /// The catalog, if ready.
    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            Self::Loading | Self::Failed { .. } => None,
        }
    }
}

/// Client for the external catalog endpoint.
///
/// Cheaply cloneable via `Arc`; the catalog is fetched once per session and
/// owned by the caller afterwards.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &StoreConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.catalog_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.catalog_url.clone(),
                timeout: config.catalog_timeout,
            }),
        })
    }

    /// Fetch and parse the product catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport failure, timeout, non-success
    /// status, or an unparsable body.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Catalog endpoint returned non-success status");
            return Err(CatalogError::Status(status));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await.map_err(|e| self.classify(e))?;

        let products = match parse_products(&body) {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                return Err(e);
            }
        };

        debug!(count = products.len(), "Catalog fetched");
        Ok(Catalog::new(products))
    }

    /// Map reqwest timeouts to the explicit `Timeout` variant.
    fn classify(&self, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout(self.inner.timeout)
        } else {
            CatalogError::Http(error)
        }
    }
}

/// Parse a JSON product array.
///
/// Unknown fields (description, category, rating, ...) are ignored; only
/// the `{id, title, image, price}` contract is consumed.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the body is not a JSON array of
/// products.
pub fn parse_products(body: &str) -> Result<Vec<Product>, CatalogError> {
    Ok(serde_json::from_str::<Vec<Product>>(body)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use trivan_core::ProductId;

    const FIXTURE: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual T-Shirt",
            "price": 22.3,
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg"
        }
    ]"#;

    #[test]
    fn test_parse_products_ignores_unknown_fields() {
        let products = parse_products(FIXTURE).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new(1));
        assert_eq!(products[0].title, "Fjallraven Backpack");
        assert_eq!(products[0].price, "109.95".parse().unwrap());
        assert_eq!(products[1].price, "22.3".parse().unwrap());
    }

    #[test]
    fn test_parse_products_rejects_non_array() {
        assert!(parse_products(r#"{"error": "nope"}"#).is_err());
        assert!(parse_products("not json at all").is_err());
    }

    #[test]
    fn test_parse_error_is_not_retryable() {
        let err = parse_products("[{]").unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = CatalogError::Timeout(Duration::from_secs(10));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_server_error_status_is_retryable() {
        assert!(CatalogError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(CatalogError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!CatalogError::Status(reqwest::StatusCode::NOT_FOUND).is_retryable());
    }

    #[test]
    fn test_catalog_state_accessor() {
        let state = CatalogState::Ready(Catalog::new(parse_products(FIXTURE).unwrap()));
        assert!(state.catalog().is_some());
        assert!(CatalogState::Loading.catalog().is_none());
    }
}
