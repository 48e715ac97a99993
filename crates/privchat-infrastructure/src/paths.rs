//! Unified path management for privchat files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/privchat/          # Config directory
//! ├── config.toml              # Application configuration
//! └── storage.json             # Durable key/value store (settings, theme)
//!
//! ~/.local/share/privchat/     # Data directory
//! └── logs/                    # Application logs
//!     └── privchat.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "privchat";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where privchat keeps its files.
///
/// Both directories can be overridden (tests, `--config-dir`); otherwise the
/// platform defaults from `dirs` are used.
#[derive(Debug, Clone)]
pub struct PrivchatPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PrivchatPaths {
    /// Creates paths from optional overrides, falling back to platform defaults.
    pub fn new(config_dir: Option<&Path>, data_dir: Option<&Path>) -> Result<Self, PathError> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_DIR),
        };
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| config_dir.join("data")),
        };
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Uses a single root for everything (handy for tests).
    pub fn rooted(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Returns the path to the durable key/value store.
    ///
    /// The file holds API keys in plain text; it is created with mode 600 on Unix.
    pub fn storage_file(&self) -> PathBuf {
        self.config_dir.join("storage.json")
    }

    /// Returns the log directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
