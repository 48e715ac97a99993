//! Application configuration model.
//!
//! Loaded from `config.toml` by `privchat_infrastructure::ConfigService`.

use crate::conversation::DEFAULT_HISTORY_LIMIT;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Root configuration.
///
/// Every field has a default, so an empty or missing `config.toml` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Product flavour to run as.
    pub profile: Profile,
    /// Prior messages sent along with each new user turn.
    pub history_limit: usize,
    /// Base URL of the OpenAI-compatible API (without trailing slash).
    pub openai_base_url: String,
    /// Overrides the config directory (durable store, config file).
    pub config_dir: Option<PathBuf>,
    /// Overrides the data directory (logs).
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            config_dir: None,
            data_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
