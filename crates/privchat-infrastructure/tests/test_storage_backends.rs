//! Both `SessionStore` backends behind the same repositories.

use privchat_core::Provider;
use privchat_core::profile::Profile;
use privchat_core::settings::{Settings, Theme};
use privchat_core::store::{SETTINGS_KEY, SessionStore};
use privchat_infrastructure::{
    DurableStore, PrivchatPaths, SettingsRepository, ThemeRepository, VolatileStore,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn exercise(store: Arc<dyn SessionStore>) {
    let settings_repo = SettingsRepository::new(store.clone());
    let theme_repo = ThemeRepository::new(store.clone());
    let defaults = Settings::for_profile(Profile::Standard);

    let settings = defaults.clone().with_credential(Provider::OpenAi, "sk-xyz");
    settings_repo.save(&settings).await.unwrap();
    theme_repo.save(Theme::Dark).await.unwrap();

    assert_eq!(settings_repo.load(&defaults).await.unwrap(), Some(settings));
    assert_eq!(theme_repo.load().await.unwrap(), Some(Theme::Dark));

    store.remove(SETTINGS_KEY).await.unwrap();
    assert!(store.get(SETTINGS_KEY).await.unwrap().is_none());
    assert_eq!(theme_repo.load().await.unwrap(), Some(Theme::Dark));

    store.clear().await.unwrap();
    assert!(theme_repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_volatile_backend() {
    exercise(Arc::new(VolatileStore::new())).await;
}

#[tokio::test]
async fn test_durable_backend() {
    let temp_dir = TempDir::new().unwrap();
    let paths = PrivchatPaths::rooted(temp_dir.path());
    exercise(Arc::new(DurableStore::new(paths.storage_file()))).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_do_not_lose_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = DurableStore::new(path.clone());
        handles.push(tokio::spawn(async move {
            store.set(&format!("key-{i}"), &i.to_string()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let store = DurableStore::new(path);
    for i in 0..8 {
        assert_eq!(
            store.get(&format!("key-{i}")).await.unwrap(),
            Some(i.to_string())
        );
    }
}
