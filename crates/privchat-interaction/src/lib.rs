//! Provider interaction for privchat.
//!
//! Everything that leaves the process goes through [`http::HttpClient`]:
//! chat completions via [`ChatTransport`] implementations and the advisory
//! credential check.

pub mod credential_validator;
pub mod http;
pub mod openai_transport;
pub mod registry;
pub mod supported_models;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod transport;

pub use credential_validator::{CredentialValidator, Validation};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use openai_transport::OpenAiTransport;
pub use registry::TransportRegistry;
pub use transport::{ChatMessage, ChatRequest, ChatTransport};
