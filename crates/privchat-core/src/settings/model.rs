use crate::error::{ChatError, Result};
use crate::profile::Profile;
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Optional behaviours the user can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    /// Show provider token usage (and estimated cost) after each reply.
    pub show_token_usage: bool,
    /// Run the advisory credential check whenever a key is saved.
    pub validate_on_save: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            show_token_usage: true,
            validate_on_save: true,
        }
    }
}

/// User settings: credentials, model selection and sampling parameters.
///
/// Credentials are plain text. `Debug` output redacts them so a stray
/// `{:?}` in a log line never leaks a key.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// API key per provider.
    #[serde(default)]
    pub credentials: BTreeMap<Provider, String>,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default)]
    pub toggles: FeatureToggles,
}

impl Settings {
    /// Default settings for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            credentials: BTreeMap::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: profile.capabilities().default_system_prompt,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            toggles: FeatureToggles::default(),
        }
    }

    /// Returns the credential for a provider if it is present and non-empty.
    pub fn credential_for(&self, provider: Provider) -> Option<&str> {
        self.credentials
            .get(&provider)
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
    }

    pub fn has_credential(&self, provider: Provider) -> bool {
        self.credential_for(provider).is_some()
    }

    /// Returns a copy with the credential for `provider` replaced.
    /// An empty key removes the entry.
    pub fn with_credential(mut self, provider: Provider, key: impl Into<String>) -> Self {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            self.credentials.remove(&provider);
        } else {
            self.credentials.insert(provider, key);
        }
        self
    }

    /// Checks field ranges before a save.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ChatError::InvalidInput("model cannot be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::InvalidInput(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ChatError::InvalidInput("max_tokens must be positive".into()));
        }
        Ok(())
    }

    /// Serializes the settings into the persisted record.
    pub fn to_record(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds settings from a persisted record.
    ///
    /// Fields present in the record override `defaults`; fields missing from
    /// an older record keep their default values.
    pub fn from_record(record: &str, defaults: &Settings) -> Result<Self> {
        let saved: serde_json::Value = serde_json::from_str(record)?;
        let serde_json::Value::Object(saved) = saved else {
            return Err(ChatError::Serialization {
                format: "JSON".to_string(),
                message: "settings record is not an object".to_string(),
            });
        };

        let mut merged = serde_json::to_value(defaults)?;
        if let serde_json::Value::Object(ref mut fields) = merged {
            for (key, value) in saved {
                fields.insert(key, value);
            }
        }
        Ok(serde_json::from_value(merged)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&Provider, &str> = self
            .credentials
            .keys()
            .map(|provider| (provider, "<redacted>"))
            .collect();
        f.debug_struct("Settings")
            .field("credentials", &redacted)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("toggles", &self.toggles)
            .finish()
    }
}
