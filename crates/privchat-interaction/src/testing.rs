//! Scripted [`HttpClient`] for tests.
//!
//! Responses are queued up front and served in order; every request is
//! recorded. A gated client parks each request until the test releases it,
//! which lets a test observe the "request outstanding" window.

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use async_trait::async_trait;
use privchat_core::error::{ChatError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

enum Scripted {
    Respond(HttpResponse),
    Fail(String),
}

struct Gate {
    entered: Notify,
    release: Notify,
}

#[derive(Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<Gate>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose requests block until [`release`](Self::release) is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Notify::new(),
            }),
            ..Self::default()
        }
    }

    /// Queues a response with the given status and raw body.
    pub fn push_json(&self, status: u16, body: &str) {
        self.lock_script()
            .push_back(Scripted::Respond(HttpResponse::new(status, body)));
    }

    /// Queues a transport-level failure.
    pub fn push_failure(&self, reason: &str) {
        self.lock_script()
            .push_back(Scripted::Fail(reason.to_string()));
    }

    /// Waits until a request has reached the gate.
    pub async fn wait_until_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    /// Lets one parked request continue.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        match self.lock_script().pop_front() {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(reason)) => Err(ChatError::network(reason)),
            None => Err(ChatError::network("no scripted response left")),
        }
    }
}
