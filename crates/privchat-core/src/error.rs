//! Error types for privchat.

use crate::provider::Provider;
use crate::conversation::Role;
use thiserror::Error;

/// Generic fallback used when a provider error body carries no message.
pub const GENERIC_PROVIDER_ERROR: &str = "API request failed";

/// A shared error type for the entire privchat workspace.
///
/// Request failures (`MissingCredential` through `NetworkError`) are the ones the
/// chat context turns into visible assistant messages; the remaining variants are
/// reported to the shell directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// No credential stored for the provider the selected model routes to.
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: Provider },

    /// The provider has no transport implementation.
    #[error("{provider} is not implemented yet")]
    NotImplemented { provider: String },

    /// Non-success HTTP status from the provider.
    #[error("{message}")]
    ProviderError { status: u16, message: String },

    /// No response, or a response body that could not be understood.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Entity not found error with type information
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A request for this conversation is still outstanding.
    #[error("A request is already in progress for this conversation")]
    RequestInFlight,

    /// Only user and assistant turns may be stored.
    #[error("Messages with role '{0}' cannot be stored in a conversation")]
    InvalidRole(Role),

    /// Input rejected before reaching any component.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backing store could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a ProviderError, falling back to the generic message when empty.
    pub fn provider(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_PROVIDER_ERROR.to_string());
        Self::ProviderError { status, message }
    }

    /// Creates a NetworkError
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError(message.into())
    }

    /// Creates a NotImplemented error
    pub fn not_implemented(provider: impl Into<String>) -> Self {
        Self::NotImplemented {
            provider: provider.into(),
        }
    }

    /// Creates a StorageUnavailable error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came out of an outbound request attempt.
    ///
    /// These are the failures the chat context renders as assistant messages.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. }
                | Self::NotImplemented { .. }
                | Self::ProviderError { .. }
                | Self::NetworkError(_)
        )
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
