//! Advisory API key check.
//!
//! Performs format checks locally, then asks `GET {base}/models` whether the
//! key is accepted. The result is informational; it never blocks sending.

use crate::http::{HttpClient, HttpRequest};
use crate::openai_transport::error_message;
use privchat_core::config::DEFAULT_OPENAI_BASE_URL;
use std::fmt;
use std::sync::Arc;

pub const EMPTY_KEY_MESSAGE: &str = "Please enter an API key";
pub const BAD_FORMAT_MESSAGE: &str = "Invalid API key format";
pub const REJECTED_KEY_MESSAGE: &str = "Invalid API key";
pub const VALIDATION_FAILED_MESSAGE: &str = "Failed to validate API key";

const OPENAI_KEY_PREFIX: &str = "sk-";

/// Outcome of a credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Valid => f.write_str("API key is valid"),
            Validation::Invalid(reason) => f.write_str(reason),
        }
    }
}

/// Validates OpenAI keys against the models endpoint.
#[derive(Clone)]
pub struct CredentialValidator {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl CredentialValidator {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn with_default_base(client: Arc<dyn HttpClient>) -> Self {
        Self::new(client, DEFAULT_OPENAI_BASE_URL)
    }

    /// Local checks only; `None` means the key is worth sending.
    pub fn check_format(credential: &str) -> Option<Validation> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Some(Validation::Invalid(EMPTY_KEY_MESSAGE.to_string()));
        }
        if !credential.starts_with(OPENAI_KEY_PREFIX) {
            return Some(Validation::Invalid(BAD_FORMAT_MESSAGE.to_string()));
        }
        None
    }

    pub async fn validate(&self, credential: &str) -> Validation {
        if let Some(rejected) = Self::check_format(credential) {
            return rejected;
        }

        let url = format!("{}/models", self.base_url);
        match self
            .client
            .execute(HttpRequest::get(url, credential.trim()))
            .await
        {
            Ok(response) if response.is_success() => {
                tracing::info!("API key accepted by provider");
                Validation::Valid
            }
            Ok(response) => {
                tracing::info!(status = response.status, "API key rejected by provider");
                Validation::Invalid(
                    error_message(&response.body)
                        .unwrap_or_else(|| REJECTED_KEY_MESSAGE.to_string()),
                )
            }
            Err(err) => {
                tracing::warn!(error = %err, "API key validation request failed");
                Validation::Invalid(VALIDATION_FAILED_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::ScriptedHttpClient;

    #[tokio::test]
    async fn test_format_checks_skip_network() {
        let client = Arc::new(ScriptedHttpClient::new());
        let validator = CredentialValidator::with_default_base(client.clone());

        assert_eq!(
            validator.validate("   ").await,
            Validation::Invalid(EMPTY_KEY_MESSAGE.into())
        );
        assert_eq!(
            validator.validate("pk-123").await,
            Validation::Invalid(BAD_FORMAT_MESSAGE.into())
        );
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_accepted_key_is_valid() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_json(200, r#"{"data":[]}"#);
        let validator = CredentialValidator::new(client.clone(), "http://localhost:1/v1");

        assert!(validator.validate("sk-good").await.is_valid());

        let sent = client.requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://localhost:1/v1/models");
    }

    #[tokio::test]
    async fn test_rejected_key_reports_provider_message() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_json(401, r#"{"error":{"message":"Incorrect API key provided"}}"#);
        client.push_json(403, "");
        let validator = CredentialValidator::with_default_base(client);

        assert_eq!(
            validator.validate("sk-bad").await,
            Validation::Invalid("Incorrect API key provided".into())
        );
        assert_eq!(
            validator.validate("sk-bad").await,
            Validation::Invalid(REJECTED_KEY_MESSAGE.into())
        );
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = Arc::new(ScriptedHttpClient::new());
        client.push_failure("dns");
        let validator = CredentialValidator::with_default_base(client);

        assert_eq!(
            validator.validate("sk-any").await,
            Validation::Invalid(VALIDATION_FAILED_MESSAGE.into())
        );
    }
}
