//! Domain layer for privchat.
//!
//! Pure types and rules: conversations, settings, provider routing, capability
//! profiles and the session store contract. No I/O happens in this crate.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod profile;
pub mod provider;
pub mod settings;
pub mod store;

// Re-export common error type
pub use error::{ChatError, Result};
pub use provider::Provider;
