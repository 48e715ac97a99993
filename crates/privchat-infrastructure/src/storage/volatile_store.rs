//! Session-only key/value store.

use async_trait::async_trait;
use privchat_core::error::Result;
use privchat_core::store::SessionStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store whose contents vanish with the process.
///
/// This is the privacy guarantee of the minimal profile: nothing written here
/// ever reaches the disk.
#[derive(Debug, Default)]
pub struct VolatileStore {
    entries: RwLock<HashMap<String, String>>,
}

impl VolatileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for VolatileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
