//! The HTTP seam every provider call goes through.
//!
//! Transports build an [`HttpRequest`] and hand it to an [`HttpClient`]; the
//! production client is [`ReqwestHttpClient`], tests substitute a scripted one.

use async_trait::async_trait;
use privchat_core::error::{ChatError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An outbound request with bearer authentication.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer: String,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, bearer: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            bearer: bearer.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, bearer: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            bearer: bearer.into(),
            body: Some(body),
        }
    }
}

// Keeps the bearer token out of debug logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes HTTP requests.
///
/// Any response that arrives, whatever its status, is `Ok`. Only a failure to
/// obtain a response at all is an error, reported as `ChatError::NetworkError`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `HttpClient` backed by `reqwest`.
///
/// No timeout is configured; a request runs until the server answers or the
/// connection fails.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let mut builder = builder.header("Authorization", format!("Bearer {}", request.bearer));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ChatError::network(format!("request to {} failed: {err}", request.url)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ChatError::network(format!("failed to read response body: {err}")))?;

        Ok(HttpResponse { status, body })
    }
}
