//! Configuration service.
//!
//! Resolves [`AppConfig`] from defaults, `config.toml` and environment
//! variables, in that order.

use crate::paths::PrivchatPaths;
use privchat_core::config::AppConfig;
use privchat_core::error::{ChatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PROFILE: &str = "PRIVCHAT_PROFILE";
pub const ENV_CONFIG_DIR: &str = "PRIVCHAT_CONFIG_DIR";
pub const ENV_LOG: &str = "PRIVCHAT_LOG";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Loads the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_dir: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a service. `config_dir` overrides both `PRIVCHAT_CONFIG_DIR`
    /// and the platform default.
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        Self { config_dir }
    }

    /// Loads configuration using the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads configuration with an explicit environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_dir = self
            .config_dir
            .clone()
            .or_else(|| env(ENV_CONFIG_DIR).map(PathBuf::from));

        let paths = PrivchatPaths::new(config_dir.as_deref(), None)
            .map_err(|e| ChatError::config(e.to_string()))?;

        let mut config = Self::read_file(&paths.config_file())?;
        if config.config_dir.is_none() {
            config.config_dir = Some(paths.config_dir().to_path_buf());
        }
        apply_env_overrides(&mut config, env)?;

        if config.history_limit == 0 {
            return Err(ChatError::config("history_limit must be at least 1"));
        }
        tracing::debug!(profile = %config.profile, "Configuration loaded");
        Ok(config)
    }

    /// Reads `config.toml`; a missing or empty file yields the defaults.
    fn read_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| ChatError::config(format!("Failed to read {}: {}", path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        Ok(toml::from_str(&content)?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(profile) = env(ENV_PROFILE) {
        config.profile = profile.parse()?;
    }
    if let Some(filter) = env(ENV_LOG) {
        config.log_filter = filter;
    }
    if let Some(url) = env(ENV_OPENAI_BASE_URL) {
        config.openai_base_url = url.trim_end_matches('/').to_string();
    }
    Ok(())
}
