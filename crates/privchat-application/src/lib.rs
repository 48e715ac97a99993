//! Application layer for privchat.
//!
//! Ties the domain model, storage and provider transports together behind
//! [`ChatContext`], the single object the shell talks to.

pub mod chat_context;
pub mod orchestrator;

pub use chat_context::{ChatContext, ContextParts, CredentialUpdate, TurnOutcome};
pub use orchestrator::{OutboundTurn, RequestOrchestrator, SendPermit};
