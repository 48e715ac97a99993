//! End-to-end flows through `ChatContext` with a scripted HTTP client.

use privchat_application::{ChatContext, ContextParts, CredentialUpdate};
use privchat_core::Provider;
use privchat_core::config::AppConfig;
use privchat_core::conversation::Role;
use privchat_core::error::ChatError;
use privchat_core::profile::Profile;
use privchat_core::settings::{Settings, Theme};
use privchat_core::store::SessionStore;
use privchat_infrastructure::{DurableStore, SettingsRepository, VolatileStore};
use privchat_interaction::Validation;
use privchat_interaction::testing::ScriptedHttpClient;
use std::sync::Arc;
use tempfile::TempDir;

const HELLO: &str =
    r#"{"choices":[{"message":{"content":"hello"}}],"usage":{"total_tokens":30}}"#;

struct Harness {
    client: Arc<ScriptedHttpClient>,
    volatile: Arc<VolatileStore>,
    context: ChatContext,
}

async fn harness(
    profile: Profile,
    client: ScriptedHttpClient,
    durable: Option<Arc<dyn SessionStore>>,
    env_credential: Option<&str>,
) -> Harness {
    let config = AppConfig {
        profile,
        openai_base_url: "http://localhost:1/v1".to_string(),
        ..AppConfig::default()
    };
    harness_with(config, client, durable, env_credential).await
}

async fn harness_with(
    config: AppConfig,
    client: ScriptedHttpClient,
    durable: Option<Arc<dyn SessionStore>>,
    env_credential: Option<&str>,
) -> Harness {
    let client = Arc::new(client);
    let volatile = Arc::new(VolatileStore::new());
    let context = ChatContext::with_parts(ContextParts {
        config,
        http: client.clone(),
        volatile: volatile.clone(),
        durable,
        env_credential: env_credential.map(str::to_string),
    })
    .await;
    Harness {
        client,
        volatile,
        context,
    }
}

fn durable_in(dir: &TempDir) -> Arc<dyn SessionStore> {
    Arc::new(DurableStore::new(dir.path().join("storage.json")))
}

fn roles_and_contents(messages: &[privchat_core::conversation::Message]) -> Vec<(Role, String)> {
    messages
        .iter()
        .map(|m| (m.role(), m.content().to_string()))
        .collect()
}

#[tokio::test]
async fn test_successful_turn_records_user_and_assistant() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    h.client.push_json(200, HELLO);

    let outcome = h.context.submit("  hi  ").await.unwrap();

    assert!(!outcome.is_error());
    assert_eq!(outcome.reply, "hello");
    assert_eq!(outcome.usage.map(|u| u.total_tokens), Some(30));
    assert_eq!(
        roles_and_contents(&h.context.history().await),
        vec![
            (Role::User, "hi".to_string()),
            (Role::Assistant, "hello".to_string())
        ]
    );
}

#[tokio::test]
async fn test_user_message_is_sent_once() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    h.client.push_json(200, HELLO);
    h.client.push_json(200, HELLO);

    h.context.submit("first").await.unwrap();
    h.context.submit("second").await.unwrap();

    let sent = h.client.requests();
    let body = sent[1].body.as_ref().unwrap();
    let messages = body["messages"].as_array().unwrap();
    let roles: Vec<&str> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(messages[3]["content"], "second");
    assert_eq!(sent[1].bearer, "sk-env");
    assert_eq!(body["temperature"], 0.7);
}

#[tokio::test]
async fn test_missing_credential_becomes_error_reply_without_network() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, None).await;

    let outcome = h.context.submit("hi").await.unwrap();

    assert_eq!(
        outcome.error,
        Some(ChatError::MissingCredential {
            provider: Provider::OpenAi
        })
    );
    assert!(outcome.reply.starts_with("Sorry, I encountered an error: "));
    assert_eq!(h.client.call_count(), 0);

    let history = h.context.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role(), Role::Assistant);
    assert_eq!(history[1].content(), outcome.reply);
}

#[tokio::test]
async fn test_provider_error_message_is_shown() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    h.client.push_json(401, r#"{"error":{"message":"invalid key"}}"#);

    let outcome = h.context.submit("hi").await.unwrap();

    assert_eq!(outcome.reply, "Sorry, I encountered an error: invalid key");
}

#[tokio::test]
async fn test_empty_input_changes_nothing() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;

    let err = h.context.submit("   ").await.unwrap_err();

    assert!(matches!(err, ChatError::InvalidInput(_)));
    assert!(h.context.history().await.is_empty());
}

#[tokio::test]
async fn test_busy_conversation_rejects_without_mutation() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::gated(), None, Some("sk-env")).await;
    h.client.push_json(200, HELLO);
    let context = Arc::new(h.context);

    let pending = {
        let context = Arc::clone(&context);
        tokio::spawn(async move { context.submit("first").await })
    };
    h.client.wait_until_entered().await;

    assert_eq!(
        context.submit("second").await.unwrap_err(),
        ChatError::RequestInFlight
    );
    assert_eq!(
        context.clear_conversation().await.unwrap_err(),
        ChatError::RequestInFlight
    );
    assert_eq!(context.history().await.len(), 1);

    h.client.release();
    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome.reply, "hello");
    assert_eq!(h.client.call_count(), 1);
    assert_eq!(context.history().await.len(), 2);
}

#[tokio::test]
async fn test_minimal_profile_checks_key_format_before_saving() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, None).await;

    let update = h
        .context
        .set_credential(Provider::OpenAi, "not-a-key")
        .await
        .unwrap();
    assert_eq!(
        update,
        CredentialUpdate::Rejected("Invalid API key format".to_string())
    );
    assert!(!h.context.settings().await.has_credential(Provider::OpenAi));
    assert_eq!(h.client.call_count(), 0);

    h.client.push_json(200, r#"{"data":[]}"#);
    let update = h
        .context
        .set_credential(Provider::OpenAi, "sk-good")
        .await
        .unwrap();
    assert_eq!(
        update,
        CredentialUpdate::Saved {
            validation: Some(Validation::Valid)
        }
    );
}

#[tokio::test]
async fn test_minimal_profile_keeps_everything_in_memory() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, None).await;
    h.client.push_json(200, "{}");
    h.context
        .set_credential(Provider::OpenAi, "sk-session")
        .await
        .unwrap();
    h.context.toggle_theme().await.unwrap();
    assert!(!h.volatile.is_empty().await);

    h.context.shutdown().await.unwrap();

    assert!(h.volatile.is_empty().await);
}

#[tokio::test]
async fn test_single_provider_profiles_refuse_other_keys() {
    let h = harness(Profile::Standard, ScriptedHttpClient::new(), None, None).await;
    let err = h
        .context
        .set_credential(Provider::Anthropic, "sk-ant")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::InvalidInput(_)));
}

#[tokio::test]
async fn test_pro_profile_reports_unimplemented_provider() {
    let h = harness(Profile::Pro, ScriptedHttpClient::new(), None, None).await;
    h.context
        .set_credential(Provider::Anthropic, "ant-key")
        .await
        .unwrap();
    h.context.set_model("claude-3-5-sonnet-latest").await.unwrap();

    let outcome = h.context.submit("hi").await.unwrap();

    assert!(matches!(outcome.error, Some(ChatError::NotImplemented { .. })));
    assert_eq!(h.client.call_count(), 0);
}

#[tokio::test]
async fn test_standard_profile_persists_settings_and_theme() {
    let dir = TempDir::new().unwrap();
    {
        let h = harness(Profile::Standard, ScriptedHttpClient::new(), Some(durable_in(&dir)), None)
            .await;
        assert_eq!(h.context.theme().await, Theme::Dark);
        h.context.set_model("gpt-4o").await.unwrap();
        h.context.set_temperature(0.2).await.unwrap();
        h.context.toggle_theme().await.unwrap();
        h.context.shutdown().await.unwrap();
    }

    let h = harness(Profile::Standard, ScriptedHttpClient::new(), Some(durable_in(&dir)), None).await;
    let settings = h.context.settings().await;
    assert_eq!(settings.model, "gpt-4o");
    assert_eq!(settings.temperature, 0.2);
    assert_eq!(h.context.theme().await, Theme::Light);
    assert!(h.context.warnings().is_empty());
}

#[tokio::test]
async fn test_pro_profile_keeps_theme_in_session() {
    let dir = TempDir::new().unwrap();
    {
        let h = harness(Profile::Pro, ScriptedHttpClient::new(), Some(durable_in(&dir)), None).await;
        h.context.toggle_theme().await.unwrap();
    }
    let h = harness(Profile::Pro, ScriptedHttpClient::new(), Some(durable_in(&dir)), None).await;
    assert_eq!(h.context.theme().await, Theme::Light);
}

#[tokio::test]
async fn test_environment_key_is_never_persisted() {
    let dir = TempDir::new().unwrap();
    let store = durable_in(&dir);
    let h = harness(
        Profile::Standard,
        ScriptedHttpClient::new(),
        Some(store.clone()),
        Some("sk-from-env"),
    )
    .await;
    assert!(h.context.settings().await.has_credential(Provider::OpenAi));

    h.context.set_model("gpt-4o-mini").await.unwrap();

    let saved = SettingsRepository::new(store)
        .load(&Settings::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.model, "gpt-4o-mini");
    assert!(!saved.has_credential(Provider::OpenAi));
}

#[tokio::test]
async fn test_stored_key_wins_over_environment() {
    let dir = TempDir::new().unwrap();
    let store = durable_in(&dir);
    SettingsRepository::new(store.clone())
        .save(&Settings::default().with_credential(Provider::OpenAi, "sk-stored"))
        .await
        .unwrap();

    let h = harness(Profile::Standard, ScriptedHttpClient::new(), Some(store), Some("sk-env")).await;

    assert_eq!(
        h.context.settings().await.credential_for(Provider::OpenAi),
        Some("sk-stored")
    );
}

#[tokio::test]
async fn test_unreadable_store_degrades_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("storage.json"), "{ broken").unwrap();

    let h = harness(Profile::Standard, ScriptedHttpClient::new(), Some(durable_in(&dir)), None).await;

    assert_eq!(h.context.settings().await, Settings::for_profile(Profile::Standard));
    assert_eq!(h.context.theme().await, Theme::Dark);
    assert_eq!(h.context.warnings().len(), 2);
}

#[tokio::test]
async fn test_conversation_switching_in_pro_profile() {
    let h = harness(Profile::Pro, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    h.client.push_json(200, HELLO);
    let first = h.context.active_conversation_id().await;
    h.context.submit("about rust").await.unwrap();

    let second = h.context.new_conversation().await.unwrap();
    assert!(h.context.history().await.is_empty());
    assert_eq!(h.context.list_conversations().await.unwrap().len(), 2);

    let err = h.context.switch_conversation("no-such-id").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(h.context.active_conversation_id().await, second);

    h.context.switch_conversation(&first[..8]).await.unwrap();
    assert_eq!(h.context.history().await.len(), 2);

    h.context.rename_conversation("Rust").await.unwrap();
    let list = h.context.list_conversations().await.unwrap();
    assert!(list.iter().any(|c| c.id == first && c.title == "Rust" && c.active));

    h.context.delete_conversation(&second).await.unwrap();
    assert_eq!(h.context.list_conversations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_single_conversation_profiles_refuse_switching() {
    let h = harness(Profile::Standard, ScriptedHttpClient::new(), None, None).await;
    let id = h.context.active_conversation_id().await;

    assert!(matches!(
        h.context.switch_conversation(&id).await.unwrap_err(),
        ChatError::InvalidInput(_)
    ));

    assert!(matches!(
        h.context.rename_conversation("Renamed").await.unwrap_err(),
        ChatError::InvalidInput(_)
    ));
    assert!(matches!(
        h.context.list_conversations().await.unwrap_err(),
        ChatError::InvalidInput(_)
    ));
    assert!(matches!(
        h.context.delete_conversation(&id).await.unwrap_err(),
        ChatError::InvalidInput(_)
    ));

    let replacement = h.context.new_conversation().await.unwrap();
    assert_ne!(replacement, id);
    assert_eq!(h.context.active_conversation_id().await, replacement);
}

#[tokio::test]
async fn test_minimal_profile_refuses_rename() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    h.client.push_json(200, HELLO);
    h.context.submit("what is ownership").await.unwrap();

    assert!(h.context.rename_conversation("x").await.is_err());
    assert!(h.context.list_conversations().await.is_err());
    assert_eq!(h.context.history().await.len(), 2);
}

#[tokio::test]
async fn test_submitted_history_is_bounded_by_limit() {
    let config = AppConfig {
        profile: Profile::Minimal,
        openai_base_url: "http://localhost:1/v1".to_string(),
        history_limit: 2,
        ..AppConfig::default()
    };
    let h = harness_with(config, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    for _ in 0..4 {
        h.client.push_json(200, HELLO);
    }

    for text in ["one", "two", "three", "four"] {
        h.context.submit(text).await.unwrap();
    }

    let sent = h.client.requests();
    assert_eq!(sent.len(), 4);
    let messages = sent[3].body.as_ref().unwrap()["messages"]
        .as_array()
        .unwrap()
        .clone();
    let pairs: Vec<(&str, &str)> = messages
        .iter()
        .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
        .collect();
    assert_eq!(pairs.len(), 1 + 2 + 1);
    assert_eq!(pairs[0].0, "system");
    assert_eq!(pairs[1..], [("user", "three"), ("assistant", "hello"), ("user", "four")]);
    assert_eq!(h.context.history().await.len(), 8);
}

#[tokio::test]
async fn test_default_history_limit_applies_to_long_conversations() {
    let h = harness(Profile::Minimal, ScriptedHttpClient::new(), None, Some("sk-env")).await;
    for _ in 0..7 {
        h.client.push_json(200, HELLO);
    }

    for turn in 0..7 {
        h.context.submit(&format!("turn {turn}")).await.unwrap();
    }

    let sent = h.client.requests();
    let messages = sent[6].body.as_ref().unwrap()["messages"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(messages.len(), 1 + 10 + 1);
    assert_eq!(messages[1]["content"], "turn 1");
    assert_eq!(messages[11]["content"], "turn 6");
}
