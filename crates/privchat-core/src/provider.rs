//! Provider routing.
//!
//! A model identifier is resolved once into a closed [`Provider`] enumeration.
//! Transports are looked up by provider, never by string prefix.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat-completion providers the client knows how to route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible endpoint (`gpt*`, `o1*`, `o3*`, `o4*`).
    OpenAi,
    /// Anthropic (`claude*`).
    Anthropic,
    /// Google Gemini (`gemini*`).
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Gemini];

    /// Resolves the provider a model identifier belongs to.
    ///
    /// Unknown model families are reported as `NotImplemented` so the caller
    /// fails before any request is built.
    pub fn from_model(model: &str) -> Result<Self> {
        let model = model.trim().to_ascii_lowercase();
        if model.starts_with("gpt")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
        {
            Ok(Provider::OpenAi)
        } else if model.starts_with("claude") {
            Ok(Provider::Anthropic)
        } else if model.starts_with("gemini") {
            Ok(Provider::Gemini)
        } else {
            Err(ChatError::not_implemented(format!("model '{model}'")))
        }
    }

    /// Stable lowercase identifier, also used as the credential map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(ChatError::InvalidInput(format!("unknown provider '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_model_routes_by_family() {
        assert_eq!(Provider::from_model("gpt-3.5-turbo").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::from_model("GPT-4o").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::from_model("o3-mini").unwrap(), Provider::OpenAi);
        assert_eq!(
            Provider::from_model("claude-sonnet-4-20250514").unwrap(),
            Provider::Anthropic
        );
        assert_eq!(Provider::from_model("gemini-2.5-flash").unwrap(), Provider::Gemini);
    }

    #[test]
    fn test_from_model_unknown_family() {
        let err = Provider::from_model("llama-3").unwrap_err();
        assert!(matches!(err, ChatError::NotImplemented { .. }));
    }

    #[test]
    fn test_parse_provider_aliases() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&Provider::Anthropic).unwrap();
        assert_eq!(json, "\"anthropic\"");
    }
}
