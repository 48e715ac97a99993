use super::message::{Message, Role};
use super::model::{Conversation, ConversationId, ConversationSummary};
use crate::error::{ChatError, Result};
use std::collections::HashMap;

/// Default number of prior messages sent along with a new user turn.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Owns every conversation and tracks which one is active.
///
/// `ConversationManager` is responsible for:
/// - Creating conversations and making them active
/// - Appending user/assistant turns
/// - Switching the active conversation
/// - Producing bounded history windows for outbound requests
///
/// There is always exactly one active conversation. In single-conversation
/// mode creating a conversation discards the previous one.
#[derive(Debug, Clone)]
pub struct ConversationManager {
    conversations: HashMap<ConversationId, Conversation>,
    active_id: ConversationId,
    multi_conversation: bool,
}

impl ConversationManager {
    /// Creates a manager holding one empty, active conversation.
    pub fn new(multi_conversation: bool) -> Self {
        let initial = Conversation::new();
        let active_id = initial.id.clone();
        let mut conversations = HashMap::new();
        conversations.insert(active_id.clone(), initial);
        Self {
            conversations,
            active_id,
            multi_conversation,
        }
    }

    pub fn is_multi_conversation(&self) -> bool {
        self.multi_conversation
    }

    /// Creates a new empty conversation, makes it active and returns its id.
    pub fn create_conversation(&mut self) -> ConversationId {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        if !self.multi_conversation {
            self.conversations.clear();
        }
        self.conversations.insert(id.clone(), conversation);
        self.active_id = id.clone();
        tracing::debug!(conversation_id = %id, "Created conversation");
        id
    }

    /// Appends a message to the active conversation.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>) -> Result<Message> {
        let id = self.active_id.clone();
        self.append_to(&id, role, content)
    }

    /// Appends a message to the given conversation.
    ///
    /// Only user and assistant turns are stored; the system prompt is injected
    /// at request time.
    pub fn append_to(
        &mut self,
        conversation_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<Message> {
        if !role.is_storable() {
            return Err(ChatError::InvalidRole(role));
        }
        let conversation = self
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| ChatError::not_found("conversation", conversation_id))?;

        let message = Message::new(role, content);
        conversation.messages.push(message.clone());
        if role == Role::User {
            conversation.refresh_title();
        }
        Ok(message)
    }

    /// Makes another conversation active.
    ///
    /// Unknown ids leave the current active conversation in place.
    pub fn switch_active(&mut self, conversation_id: &str) -> Result<()> {
        if !self.conversations.contains_key(conversation_id) {
            return Err(ChatError::not_found("conversation", conversation_id));
        }
        self.active_id = conversation_id.to_string();
        Ok(())
    }

    /// Returns the most recent `limit` messages of the active conversation in
    /// insertion order.
    pub fn history(&self, limit: usize) -> Vec<Message> {
        self.history_of(&self.active_id, limit).unwrap_or_default()
    }

    /// Returns the most recent `limit` messages of the given conversation.
    pub fn history_of(&self, conversation_id: &str, limit: usize) -> Result<Vec<Message>> {
        let conversation = self.get(conversation_id)?;
        let skip = conversation.messages.len().saturating_sub(limit);
        Ok(conversation.messages[skip..].to_vec())
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Conversation {
        // `active_id` always refers to a stored conversation.
        &self.conversations[&self.active_id]
    }

    pub fn get(&self, conversation_id: &str) -> Result<&Conversation> {
        self.conversations
            .get(conversation_id)
            .ok_or_else(|| ChatError::not_found("conversation", conversation_id))
    }

    /// Sets an explicit title. Derived titles never replace it afterwards.
    pub fn set_title(&mut self, conversation_id: &str, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChatError::InvalidInput("title cannot be empty".into()));
        }
        let conversation = self
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| ChatError::not_found("conversation", conversation_id))?;
        conversation.set_custom_title(title.trim());
        Ok(())
    }

    /// Drops every message of the active conversation and resets its title.
    pub fn clear_active(&mut self) {
        if let Some(conversation) = self.conversations.get_mut(&self.active_id) {
            conversation.messages.clear();
            conversation.reset_title();
        }
    }

    /// Deletes a conversation.
    ///
    /// Deleting the active conversation activates the most recently created
    /// remaining one, or a fresh empty conversation when none is left.
    pub fn delete_conversation(&mut self, conversation_id: &str) -> Result<()> {
        if self.conversations.remove(conversation_id).is_none() {
            return Err(ChatError::not_found("conversation", conversation_id));
        }
        if self.active_id == conversation_id {
            let next = self
                .conversations
                .values()
                .max_by_key(|c| c.created_at)
                .map(|c| c.id.clone());
            match next {
                Some(id) => self.active_id = id,
                None => {
                    self.create_conversation();
                }
            }
        }
        Ok(())
    }

    /// Lists conversations, newest first.
    pub fn list(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .conversations
            .values()
            .map(|c| c.summary(c.id == self.active_id))
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Resolves a unique id prefix to a full conversation id.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<ConversationId> {
        let mut matches = self
            .conversations
            .keys()
            .filter(|id| id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) if !prefix.is_empty() => Ok(id.clone()),
            (Some(_), Some(_)) => Err(ChatError::InvalidInput(format!(
                "conversation prefix '{prefix}' is ambiguous"
            ))),
            _ => Err(ChatError::not_found("conversation", prefix)),
        }
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new(false)
    }
}
