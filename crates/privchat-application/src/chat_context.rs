//! The application context.
//!
//! `ChatContext` owns every piece of client state for one run: settings, theme,
//! conversations and the request orchestrator. The shell holds exactly one and
//! passes it around explicitly.

use crate::orchestrator::{OutboundTurn, RequestOrchestrator};
use privchat_core::Provider;
use privchat_core::completion::{Completion, RequestState, Usage};
use privchat_core::config::AppConfig;
use privchat_core::conversation::{
    ConversationId, ConversationManager, ConversationSummary, Message, Role,
};
use privchat_core::error::{ChatError, Result};
use privchat_core::profile::{Capabilities, Profile, StorageKind};
use privchat_core::settings::{Settings, Theme};
use privchat_core::store::SessionStore;
use privchat_infrastructure::{
    DurableStore, PrivchatPaths, SettingsRepository, ThemeRepository, VolatileStore,
};
use privchat_interaction::{
    CredentialValidator, HttpClient, ReqwestHttpClient, TransportRegistry, Validation,
};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Environment variable that can supply an OpenAI key for this run only.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Prefix of the assistant message shown when a request fails.
pub const ERROR_REPLY_PREFIX: &str = "Sorry, I encountered an error: ";

/// Result of submitting one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub conversation_id: ConversationId,
    /// Text of the assistant message that was appended.
    pub reply: String,
    pub usage: Option<Usage>,
    /// Set when the request failed and `reply` describes the error.
    pub error: Option<ChatError>,
}

impl TurnOutcome {
    fn replied(conversation_id: ConversationId, completion: Completion) -> Self {
        Self {
            conversation_id,
            reply: completion.content,
            usage: completion.usage,
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of storing an API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialUpdate {
    /// Stored. `validation` holds the advisory check when one ran.
    Saved { validation: Option<Validation> },
    /// Refused by the local format check; nothing was stored.
    Rejected(String),
}

/// Collaborators a context is assembled from.
pub struct ContextParts {
    pub config: AppConfig,
    pub http: Arc<dyn HttpClient>,
    pub volatile: Arc<VolatileStore>,
    /// Disk-backed store; `None` makes durable capabilities fall back to memory.
    pub durable: Option<Arc<dyn SessionStore>>,
    /// Key taken from the environment, used only when none is stored.
    pub env_credential: Option<String>,
}

pub struct ChatContext {
    config: AppConfig,
    capabilities: Capabilities,
    conversations: Arc<RwLock<ConversationManager>>,
    orchestrator: RequestOrchestrator,
    validator: CredentialValidator,
    settings_repository: SettingsRepository,
    theme_repository: ThemeRepository,
    volatile: Arc<VolatileStore>,
    settings: RwLock<Settings>,
    theme: RwLock<Theme>,
    seeded_credential: Mutex<Option<String>>,
    warnings: Vec<String>,
}

impl ChatContext {
    /// Builds the production context for `config`.
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        let paths = PrivchatPaths::new(config.config_dir.as_deref(), config.data_dir.as_deref())
            .map_err(|e| ChatError::config(e.to_string()))?;

        let durable: Option<Arc<dyn SessionStore>> =
            if config.profile.capabilities().needs_durable_store() {
                Some(Arc::new(DurableStore::new(paths.storage_file())))
            } else {
                None
            };

        let parts = ContextParts {
            config,
            http: Arc::new(ReqwestHttpClient::new()),
            volatile: Arc::new(VolatileStore::new()),
            durable,
            env_credential: std::env::var(ENV_OPENAI_API_KEY).ok(),
        };
        Ok(Self::with_parts(parts).await)
    }

    /// Assembles a context from explicit parts and loads saved state.
    ///
    /// Unreadable stores never fail the start-up; the context falls back to
    /// profile defaults and records a warning.
    pub async fn with_parts(parts: ContextParts) -> Self {
        let ContextParts {
            config,
            http,
            volatile,
            durable,
            env_credential,
        } = parts;
        let profile = config.profile;
        let capabilities = profile.capabilities();
        let mut warnings = Vec::new();

        if capabilities.needs_durable_store() && durable.is_none() {
            warnings.push("No durable store available; settings last for this session only".into());
        }
        let settings_store = pick_store(capabilities.settings_storage, &durable, &volatile);
        let theme_store = pick_store(capabilities.theme_storage, &durable, &volatile);
        let settings_repository = SettingsRepository::new(settings_store);
        let theme_repository = ThemeRepository::new(theme_store);

        let defaults = Settings::for_profile(profile);
        let mut settings = match settings_repository.load(&defaults).await {
            Ok(Some(saved)) => saved,
            Ok(None) => defaults,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load settings, using defaults");
                warnings.push(format!("Could not load saved settings ({err}); using defaults"));
                defaults
            }
        };

        let mut seeded_credential = None;
        if !settings.has_credential(Provider::OpenAi) {
            if let Some(key) = env_credential.filter(|k| !k.trim().is_empty()) {
                tracing::info!("Using OpenAI key from {}", ENV_OPENAI_API_KEY);
                settings = settings.with_credential(Provider::OpenAi, key.trim());
                seeded_credential = Some(key.trim().to_string());
            }
        }

        let theme = match theme_repository.load().await {
            Ok(Some(theme)) => theme,
            Ok(None) => capabilities.default_theme,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load theme, using default");
                warnings.push(format!("Could not load saved theme ({err}); using default"));
                capabilities.default_theme
            }
        };

        let conversations = Arc::new(RwLock::new(ConversationManager::new(
            capabilities.multi_conversation,
        )));
        let registry = TransportRegistry::openai_only(http.clone(), config.openai_base_url.as_str());
        let orchestrator = RequestOrchestrator::new(conversations.clone(), registry);
        let validator = CredentialValidator::new(http, config.openai_base_url.as_str());

        tracing::info!(profile = %profile, theme = %theme, "Chat context ready");

        Self {
            config,
            capabilities,
            conversations,
            orchestrator,
            validator,
            settings_repository,
            theme_repository,
            volatile,
            settings: RwLock::new(settings),
            theme: RwLock::new(theme),
            seeded_credential: Mutex::new(seeded_credential),
            warnings,
        }
    }

    pub fn profile(&self) -> Profile {
        self.config.profile
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Problems met while loading saved state.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    /// Sends `text` as a user message in the active conversation.
    ///
    /// Request failures are not returned as errors: they become an assistant
    /// message and are reported through [`TurnOutcome::error`]. Errors are
    /// returned only when nothing was changed (empty input, busy conversation).
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidInput("message cannot be empty".into()));
        }
        let settings = self.settings().await;

        let (permit, turn) = {
            let mut conversations = self.conversations.write().await;
            let conversation_id = conversations.active_id().to_string();
            let permit = self.orchestrator.begin(&conversation_id)?;
            let history = conversations.history_of(&conversation_id, self.config.history_limit)?;
            conversations.append_to(&conversation_id, Role::User, text)?;
            let turn = OutboundTurn {
                conversation_id,
                history,
                user_message: text.to_string(),
            };
            (permit, turn)
        };

        let conversation_id = turn.conversation_id.clone();
        match self.orchestrator.dispatch(permit, &settings, turn).await {
            Ok(completion) => Ok(TurnOutcome::replied(conversation_id, completion)),
            Err(error) => {
                tracing::info!(conversation_id = %conversation_id, error = %error, "Chat request failed");
                let reply = format!("{ERROR_REPLY_PREFIX}{error}");
                if let Err(err) = self.conversations.write().await.append_to(
                    &conversation_id,
                    Role::Assistant,
                    reply.as_str(),
                ) {
                    tracing::warn!(error = %err, "Could not record error reply");
                }
                Ok(TurnOutcome {
                    conversation_id,
                    reply,
                    usage: None,
                    error: Some(error),
                })
            }
        }
    }

    pub async fn request_state(&self) -> RequestState {
        let conversations = self.conversations.read().await;
        self.orchestrator.state(conversations.active_id())
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Validates, applies and persists settings.
    ///
    /// The new settings take effect for this session even if the write fails;
    /// the write error is still returned.
    pub async fn save_settings(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        let record = self.persistable(&settings);
        *self.settings.write().await = settings;
        self.settings_repository.save(&record).await?;
        tracing::debug!("Settings saved");
        Ok(())
    }

    /// Stores an API key for `provider`.
    pub async fn set_credential(&self, provider: Provider, key: &str) -> Result<CredentialUpdate> {
        if !self.capabilities.multi_provider && provider != Provider::OpenAi {
            return Err(ChatError::InvalidInput(format!(
                "{provider} keys are not available in the {} profile",
                self.profile()
            )));
        }

        let validate = self.capabilities.credential_validation && provider == Provider::OpenAi;
        if validate {
            if let Some(Validation::Invalid(reason)) = CredentialValidator::check_format(key) {
                return Ok(CredentialUpdate::Rejected(reason));
            }
        }

        if provider == Provider::OpenAi {
            *lock(&self.seeded_credential) = None;
        }
        let settings = self.settings().await.with_credential(provider, key);
        let validate = validate && settings.toggles.validate_on_save;
        self.save_settings(settings).await?;
        tracing::info!(provider = %provider, "API key updated");

        let validation = if validate {
            Some(self.validator.validate(key).await)
        } else {
            None
        };
        Ok(CredentialUpdate::Saved { validation })
    }

    pub async fn set_model(&self, model: &str) -> Result<()> {
        let mut settings = self.settings().await;
        settings.model = model.trim().to_string();
        self.save_settings(settings).await
    }

    /// Sets the system prompt. An empty prompt restores the profile default.
    pub async fn set_system_prompt(&self, prompt: &str) -> Result<()> {
        let mut settings = self.settings().await;
        settings.system_prompt = if prompt.trim().is_empty() {
            self.capabilities.default_system_prompt.clone()
        } else {
            prompt.trim().to_string()
        };
        self.save_settings(settings).await
    }

    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        let mut settings = self.settings().await;
        settings.temperature = temperature;
        self.save_settings(settings).await
    }

    /// Runs the advisory check on the stored OpenAI key.
    pub async fn validate_credential(&self) -> Validation {
        let settings = self.settings().await;
        let key = settings.credential_for(Provider::OpenAi).unwrap_or_default();
        self.validator.validate(key).await
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    pub async fn toggle_theme(&self) -> Result<Theme> {
        let theme = {
            let mut current = self.theme.write().await;
            *current = current.toggle();
            *current
        };
        self.theme_repository.save(theme).await?;
        Ok(theme)
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    /// Starts a new conversation. In single-conversation profiles this
    /// discards the current one.
    pub async fn new_conversation(&self) -> Result<ConversationId> {
        let mut conversations = self.conversations.write().await;
        self.ensure_idle(conversations.active_id())?;
        if !self.capabilities.multi_conversation {
            let old = conversations.active_id().to_string();
            self.orchestrator.forget(&old);
        }
        Ok(conversations.create_conversation())
    }

    /// Switches to the conversation whose id starts with `prefix`.
    pub async fn switch_conversation(&self, prefix: &str) -> Result<ConversationId> {
        self.ensure_multi_conversation()?;
        let mut conversations = self.conversations.write().await;
        let id = conversations.resolve_prefix(prefix.trim())?;
        conversations.switch_active(&id)?;
        Ok(id)
    }

    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.ensure_multi_conversation()?;
        Ok(self.conversations.read().await.list())
    }

    /// Renames the active conversation.
    pub async fn rename_conversation(&self, title: &str) -> Result<()> {
        self.ensure_multi_conversation()?;
        let mut conversations = self.conversations.write().await;
        let id = conversations.active_id().to_string();
        conversations.set_title(&id, title)
    }

    pub async fn delete_conversation(&self, prefix: &str) -> Result<()> {
        self.ensure_multi_conversation()?;
        let mut conversations = self.conversations.write().await;
        let id = conversations.resolve_prefix(prefix.trim())?;
        self.ensure_idle(&id)?;
        conversations.delete_conversation(&id)?;
        self.orchestrator.forget(&id);
        Ok(())
    }

    /// Drops every message of the active conversation.
    pub async fn clear_conversation(&self) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        self.ensure_idle(conversations.active_id())?;
        conversations.clear_active();
        Ok(())
    }

    pub async fn active_conversation_id(&self) -> ConversationId {
        self.conversations.read().await.active_id().to_string()
    }

    /// Every message of the active conversation.
    pub async fn history(&self) -> Vec<Message> {
        self.conversations.read().await.active().messages.clone()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Ends the session: session-only data is wiped. No network access.
    pub async fn shutdown(&self) -> Result<()> {
        self.volatile.clear().await?;
        tracing::info!("Session ended, data cleared");
        Ok(())
    }

    fn ensure_multi_conversation(&self) -> Result<()> {
        if self.capabilities.multi_conversation {
            Ok(())
        } else {
            Err(ChatError::InvalidInput(format!(
                "multiple conversations are not available in the {} profile",
                self.profile()
            )))
        }
    }

    fn ensure_idle(&self, conversation_id: &str) -> Result<()> {
        if self.orchestrator.is_sending(conversation_id) {
            Err(ChatError::RequestInFlight)
        } else {
            Ok(())
        }
    }

    /// Settings as they may be written: a key seeded from the environment is
    /// never persisted.
    fn persistable(&self, settings: &Settings) -> Settings {
        let seeded = lock(&self.seeded_credential).clone();
        match seeded {
            Some(key) if settings.credential_for(Provider::OpenAi) == Some(key.as_str()) => {
                settings.clone().with_credential(Provider::OpenAi, "")
            }
            _ => settings.clone(),
        }
    }
}

fn pick_store(
    kind: StorageKind,
    durable: &Option<Arc<dyn SessionStore>>,
    volatile: &Arc<VolatileStore>,
) -> Arc<dyn SessionStore> {
    match (kind, durable) {
        (StorageKind::Durable, Some(store)) => Arc::clone(store),
        _ => Arc::clone(volatile) as Arc<dyn SessionStore>,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
