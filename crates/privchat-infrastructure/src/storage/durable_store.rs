//! Durable key/value store backed by a single JSON file.

use super::atomic_json::{AtomicJsonError, AtomicJsonFile};
use async_trait::async_trait;
use privchat_core::error::{ChatError, Result};
use privchat_core::store::SessionStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Entries = BTreeMap<String, String>;

/// Key/value store persisted to `storage.json`.
///
/// Every mutation is a locked read-modify-write of the whole file, run on the
/// blocking pool. Values (API keys included) are stored in plain text.
#[derive(Clone)]
pub struct DurableStore {
    file: Arc<AtomicJsonFile<Entries>>,
}

impl DurableStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn run_blocking<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicJsonFile<Entries>) -> std::result::Result<R, AtomicJsonError>
            + Send
            + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| ChatError::storage(format!("Failed to join storage task: {}", e)))?
            .map_err(|e| ChatError::storage(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for DurableStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            Ok(file.load()?.and_then(|mut entries| entries.remove(&key)))
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        tracing::debug!(key = %key, path = %self.path().display(), "Writing durable store entry");
        self.run_blocking(move |file| {
            file.update(Entries::new(), |entries| {
                entries.insert(key, value);
                Ok(())
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            file.update(Entries::new(), |entries| {
                entries.remove(&key);
                Ok(())
            })
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.run_blocking(|file| {
            file.update(Entries::new(), |entries| {
                entries.clear();
                Ok(())
            })
        })
        .await
    }
}
