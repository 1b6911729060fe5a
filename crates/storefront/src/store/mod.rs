//! Persistent key-value storage.
//!
//! The persisted store is a simple string key-value store scoped to the
//! store's data directory, the analogue of per-origin browser storage. One
//! key holds the JSON-serialized cart, another the popup dismissal record.
//! Last-writer-wins; no transactional guarantees.
//!
//! The [`KeyValueStore`] trait uses `&self` for all methods, allowing
//! implementations to use interior mutability for shared access.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Store key holding the JSON-serialized cart lines.
pub const CART_KEY: &str = "online-store";

/// Store key holding the popup dismissal record.
pub const POPUP_KEY: &str = "popupCookie";

/// Errors from persistent store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot represent.
    #[error("Invalid store key: {0}")]
    InvalidKey(String),
}

/// A string key-value persistence interface.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or update a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails to write.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value by key.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails to delete.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
