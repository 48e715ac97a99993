//! Session store contract.
//!
//! Defines the key/value interface that settings and preferences are persisted
//! through. Backends live in `privchat-infrastructure`.

use crate::error::Result;
use async_trait::async_trait;

/// Fixed key of the persisted settings record.
pub const SETTINGS_KEY: &str = "privchat_settings";

/// Fixed key of the theme preference.
pub const THEME_KEY: &str = "privchat_theme";

/// A string key/value store.
///
/// Values are stored as plain text. Implementations report an unusable
/// backend as `ChatError::StorageUnavailable`; callers degrade to defaults.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Gets the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Value found
    /// - `Ok(None)`: Nothing stored under `key`
    /// - `Err(_)`: The backend could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Removes every key.
    async fn clear(&self) -> Result<()>;
}
