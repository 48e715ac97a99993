//! Model identifiers offered for completion in the shell.
//!
//! Any id can be typed; routing only looks at the family prefix
//! (see `Provider::from_model`). Only the OpenAI family has a transport.
//!
//! | Model ID | Provider | Notes |
//! |----------|----------|-------|
//! | `gpt-3.5-turbo` | OpenAI | Default |
//! | `gpt-4o` | OpenAI | |
//! | `gpt-4o-mini` | OpenAI | |
//! | `gpt-4-turbo` | OpenAI | |
//! | `o1-mini` | OpenAI | |
//! | `claude-3-5-sonnet-latest` | Anthropic | Not implemented |
//! | `gemini-1.5-pro` | Gemini | Not implemented |

use privchat_core::Provider;

pub const SUGGESTED_MODELS: &[&str] = &[
    "gpt-3.5-turbo",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo",
    "o1-mini",
    "claude-3-5-sonnet-latest",
    "gemini-1.5-pro",
];

/// Suggested models that route to `provider`.
pub fn models_for(provider: Provider) -> Vec<&'static str> {
    SUGGESTED_MODELS
        .iter()
        .copied()
        .filter(|model| Provider::from_model(model).ok() == Some(provider))
        .collect()
}
