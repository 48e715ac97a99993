//! Infrastructure layer for privchat: storage backends, persistence of
//! settings and configuration loading.

pub mod config_service;
pub mod paths;
pub mod settings_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::PrivchatPaths;
pub use crate::settings_repository::{SettingsRepository, ThemeRepository};
pub use crate::storage::{DurableStore, VolatileStore};
