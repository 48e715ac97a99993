//! Capability profiles.
//!
//! One implementation serves every product flavour; a [`Profile`] picks the
//! [`Capabilities`] that differ between them.

use crate::error::ChatError;
use crate::settings::Theme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a piece of client state lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In memory only; gone when the process exits.
    Volatile,
    /// Written to the durable store on disk.
    Durable,
}

/// Product flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Session-only storage, credential validation, single conversation.
    #[default]
    Minimal,
    /// Durable settings, single conversation.
    Standard,
    /// Durable settings, multiple conversations, provider selection.
    Pro,
}

/// Feature switches derived from a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub multi_conversation: bool,
    pub multi_provider: bool,
    pub credential_validation: bool,
    pub settings_storage: StorageKind,
    pub theme_storage: StorageKind,
    pub default_theme: Theme,
    pub default_system_prompt: String,
}

pub const HELPFUL_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Provide clear, concise, and accurate responses.";
pub const PRIVACY_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant focused on privacy and security.";

impl Profile {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Profile::Minimal => Capabilities {
                multi_conversation: false,
                multi_provider: false,
                credential_validation: true,
                settings_storage: StorageKind::Volatile,
                theme_storage: StorageKind::Volatile,
                default_theme: Theme::Light,
                default_system_prompt: HELPFUL_SYSTEM_PROMPT.to_string(),
            },
            Profile::Standard => Capabilities {
                multi_conversation: false,
                multi_provider: false,
                credential_validation: false,
                settings_storage: StorageKind::Durable,
                theme_storage: StorageKind::Durable,
                default_theme: Theme::Dark,
                default_system_prompt: PRIVACY_SYSTEM_PROMPT.to_string(),
            },
            Profile::Pro => Capabilities {
                multi_conversation: true,
                multi_provider: true,
                credential_validation: false,
                settings_storage: StorageKind::Durable,
                theme_storage: StorageKind::Volatile,
                default_theme: Theme::Light,
                default_system_prompt: HELPFUL_SYSTEM_PROMPT.to_string(),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Standard => "standard",
            Profile::Pro => "pro",
        }
    }
}

impl Capabilities {
    /// Whether anything at all touches the disk.
    pub fn needs_durable_store(&self) -> bool {
        self.settings_storage == StorageKind::Durable || self.theme_storage == StorageKind::Durable
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" | "privategpt" => Ok(Profile::Minimal),
            "standard" | "zerotrace" => Ok(Profile::Standard),
            "pro" => Ok(Profile::Pro),
            other => Err(ChatError::config(format!("unknown profile '{other}'"))),
        }
    }
}
