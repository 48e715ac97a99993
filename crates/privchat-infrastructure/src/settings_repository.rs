//! Settings and theme persistence on top of a [`SessionStore`].

use privchat_core::error::Result;
use privchat_core::settings::{Settings, Theme};
use privchat_core::store::{SETTINGS_KEY, SessionStore, THEME_KEY};
use std::sync::Arc;

/// Reads and writes the single persisted settings record.
///
/// The record is one JSON object under [`SETTINGS_KEY`]. Which store backs it
/// (volatile or durable) is decided by the caller from the active profile.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn SessionStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Loads the stored settings merged over `defaults`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Settings))`: A record was found and parsed
    /// - `Ok(None)`: Nothing saved yet
    /// - `Err(_)`: Store unavailable or record unreadable
    pub async fn load(&self, defaults: &Settings) -> Result<Option<Settings>> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(record) => Ok(Some(Settings::from_record(&record, defaults)?)),
            None => Ok(None),
        }
    }

    /// Persists the settings record.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let record = settings.to_record()?;
        self.store.set(SETTINGS_KEY, &record).await
    }
}

/// Reads and writes the theme preference under [`THEME_KEY`].
#[derive(Clone)]
pub struct ThemeRepository {
    store: Arc<dyn SessionStore>,
}

impl ThemeRepository {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<Theme>> {
        match self.store.get(THEME_KEY).await? {
            Some(value) => Ok(Some(value.parse()?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str()).await
    }
}
