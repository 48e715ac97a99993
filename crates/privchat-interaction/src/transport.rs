//! Provider-neutral chat request types and the transport trait.

use async_trait::async_trait;
use privchat_core::completion::Completion;
use privchat_core::conversation::{Message, Role};
use privchat_core::error::Result;
use privchat_core::settings::Settings;
use serde::Serialize;

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role(), message.content())
    }
}

/// A complete chat-completion request.
///
/// `messages` always starts with the system prompt, followed by prior turns
/// and the new user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

impl ChatRequest {
    pub fn build(settings: &Settings, history: &[Message], user_message: &str) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::new(Role::System, settings.system_prompt.as_str()));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::new(Role::User, user_message));

        Self {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            stream: false,
        }
    }
}

/// Sends chat requests to one provider.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Performs a single request. No retries.
    async fn complete(&self, credential: &str, request: &ChatRequest) -> Result<Completion>;
}
