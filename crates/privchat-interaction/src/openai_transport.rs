//! OpenAI-compatible Chat Completions transport.

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::transport::{ChatRequest, ChatTransport};
use async_trait::async_trait;
use privchat_core::completion::{Completion, NO_RESPONSE_SENTINEL, Usage};
use privchat_core::config::DEFAULT_OPENAI_BASE_URL;
use privchat_core::error::{ChatError, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Talks to `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiTransport {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl OpenAiTransport {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn with_default_base(client: Arc<dyn HttpClient>) -> Self {
        Self::new(client, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<Completion> {
        let body = serde_json::to_value(request)?;
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .execute(HttpRequest::post(self.endpoint(), credential, body))
            .await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "Chat completion rejected");
            return Err(map_http_error(&response));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|err| ChatError::network(format!("Failed to parse OpenAI response: {err}")))?;

        Ok(extract_completion(parsed))
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ResponseUsage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_completion(response: ChatCompletionResponse) -> Completion {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string());

    Completion {
        content,
        usage: response.usage.map(|u| Usage {
            total_tokens: u.total_tokens,
        }),
    }
}

/// Extracts `error.message` from an error body, if there is one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
}

fn map_http_error(response: &HttpResponse) -> ChatError {
    ChatError::provider(response.status, error_message(&response.body))
}
