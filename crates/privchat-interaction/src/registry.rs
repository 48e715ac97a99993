//! Provider → transport lookup.

use crate::http::HttpClient;
use crate::openai_transport::OpenAiTransport;
use crate::transport::ChatTransport;
use privchat_core::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered transports, keyed by provider.
///
/// A provider with no entry has no implementation; callers report it as
/// `ChatError::NotImplemented`.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    transports: HashMap<Provider, Arc<dyn ChatTransport>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the OpenAI-compatible transport only.
    pub fn openai_only(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let mut registry = Self::new();
        registry.register(
            Provider::OpenAi,
            Arc::new(OpenAiTransport::new(client, base_url)),
        );
        registry
    }

    pub fn register(&mut self, provider: Provider, transport: Arc<dyn ChatTransport>) {
        self.transports.insert(provider, transport);
    }

    pub fn get(&self, provider: Provider) -> Option<Arc<dyn ChatTransport>> {
        self.transports.get(&provider).cloned()
    }
}
