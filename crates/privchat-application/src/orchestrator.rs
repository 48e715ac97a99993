//! Request orchestration.
//!
//! Turns a user turn into exactly one provider call and records the reply.
//! Each conversation runs a small state machine
//! (`Idle -> Sending -> Succeeded | Failed`); a second request for a
//! conversation that is still `Sending` is rejected, never queued.

use privchat_core::Provider;
use privchat_core::completion::{Completion, RequestState};
use privchat_core::conversation::{ConversationId, ConversationManager, Message, Role};
use privchat_core::error::{ChatError, Result};
use privchat_core::settings::Settings;
use privchat_interaction::{ChatRequest, TransportRegistry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;

type StateMap = HashMap<ConversationId, RequestState>;

/// Everything needed to send one user turn.
#[derive(Debug, Clone)]
pub struct OutboundTurn {
    pub conversation_id: ConversationId,
    /// Prior messages, taken before the user message was appended.
    pub history: Vec<Message>,
    pub user_message: String,
}

/// Marks a conversation as `Sending` for as long as it lives.
///
/// Dropping an uncompleted permit records `Failed`.
pub struct SendPermit {
    states: Arc<Mutex<StateMap>>,
    conversation_id: ConversationId,
    completed: bool,
}

impl SendPermit {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    fn complete(mut self) {
        set_state(&self.states, &self.conversation_id, RequestState::Succeeded);
        self.completed = true;
    }
}

impl Drop for SendPermit {
    fn drop(&mut self) {
        if !self.completed {
            set_state(&self.states, &self.conversation_id, RequestState::Failed);
        }
    }
}

fn lock_states(states: &Mutex<StateMap>) -> MutexGuard<'_, StateMap> {
    // A poisoned map is still consistent: every write is a single insert.
    states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_state(states: &Mutex<StateMap>, conversation_id: &str, state: RequestState) {
    lock_states(states).insert(conversation_id.to_string(), state);
}

/// Sends chat turns through the registered transports.
#[derive(Clone)]
pub struct RequestOrchestrator {
    conversations: Arc<RwLock<ConversationManager>>,
    registry: TransportRegistry,
    states: Arc<Mutex<StateMap>>,
}

impl RequestOrchestrator {
    pub fn new(conversations: Arc<RwLock<ConversationManager>>, registry: TransportRegistry) -> Self {
        Self {
            conversations,
            registry,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Moves a conversation into `Sending`.
    ///
    /// Fails with `RequestInFlight` if a request is already outstanding.
    pub fn begin(&self, conversation_id: &str) -> Result<SendPermit> {
        let mut states = lock_states(&self.states);
        if states
            .get(conversation_id)
            .is_some_and(RequestState::is_sending)
        {
            return Err(ChatError::RequestInFlight);
        }
        states.insert(conversation_id.to_string(), RequestState::Sending);
        Ok(SendPermit {
            states: Arc::clone(&self.states),
            conversation_id: conversation_id.to_string(),
            completed: false,
        })
    }

    /// Acquires a permit and dispatches the turn.
    pub async fn send(&self, settings: &Settings, turn: OutboundTurn) -> Result<Completion> {
        let permit = self.begin(&turn.conversation_id)?;
        self.dispatch(permit, settings, turn).await
    }

    /// Sends a turn for which a permit is already held.
    ///
    /// On success the assistant reply is appended to `turn.conversation_id`;
    /// on failure no conversation is touched.
    pub async fn dispatch(
        &self,
        permit: SendPermit,
        settings: &Settings,
        turn: OutboundTurn,
    ) -> Result<Completion> {
        if permit.conversation_id() != turn.conversation_id {
            return Err(ChatError::InvalidInput(
                "permit does not belong to this conversation".to_string(),
            ));
        }

        let provider = Provider::from_model(&settings.model)?;
        let credential = settings
            .credential_for(provider)
            .ok_or(ChatError::MissingCredential { provider })?;
        let transport = self
            .registry
            .get(provider)
            .ok_or_else(|| ChatError::not_implemented(provider.display_name()))?;

        let request = ChatRequest::build(settings, &turn.history, &turn.user_message);
        tracing::debug!(
            conversation_id = %turn.conversation_id,
            provider = %provider,
            history = turn.history.len(),
            "Dispatching chat request"
        );

        let completion = transport.complete(credential, &request).await?;

        {
            let mut conversations = self.conversations.write().await;
            if let Err(err) =
                conversations.append_to(&turn.conversation_id, Role::Assistant, &completion.content)
            {
                // The conversation was deleted while the request was outstanding.
                tracing::warn!(
                    conversation_id = %turn.conversation_id,
                    error = %err,
                    "Dropping reply for missing conversation"
                );
            }
        }

        permit.complete();
        Ok(completion)
    }

    pub fn state(&self, conversation_id: &str) -> RequestState {
        lock_states(&self.states)
            .get(conversation_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_sending(&self, conversation_id: &str) -> bool {
        self.state(conversation_id).is_sending()
    }

    /// Forgets the state of a deleted conversation.
    pub fn forget(&self, conversation_id: &str) {
        let mut states = lock_states(&self.states);
        if !states.get(conversation_id).is_some_and(RequestState::is_sending) {
            states.remove(conversation_id);
        }
    }
}
