//! Conversation domain model.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title every conversation starts with until one is derived or set.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of characters of the first user message kept in a derived title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Identifier of a conversation (UUID v4 string).
pub type ConversationId = String;

/// One ordered thread of user/assistant messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    /// Set once the user names the conversation.
    #[serde(default)]
    pub title_customized: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
            title_customized: false,
        }
    }

    /// Whether the title is still the placeholder. A title the user set is
    /// never the placeholder, even when it reads "New Chat".
    pub fn has_default_title(&self) -> bool {
        !self.title_customized && self.title == DEFAULT_TITLE
    }

    pub fn set_custom_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.title_customized = true;
    }

    pub fn reset_title(&mut self) {
        self.title = DEFAULT_TITLE.to_string();
        self.title_customized = false;
    }

    /// Replaces the placeholder title with one derived from the first user
    /// message. A title that was already derived or set is left untouched.
    pub fn refresh_title(&mut self) {
        if !self.has_default_title() {
            return;
        }
        if let Some(first) = self
            .messages
            .iter()
            .find(|m| m.role() == super::Role::User)
        {
            self.title = derive_title(first.content());
        }
    }

    pub fn summary(&self, active: bool) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            created_at: self.created_at,
            active,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight listing entry for the conversation switcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

/// Derives a conversation title from the first user message.
///
/// Keeps the first 30 characters (not bytes) of the trimmed content and
/// appends `...` when anything was cut off.
pub fn derive_title(content: &str) -> String {
    let content = content.trim();
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
