//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Message types (`Role`, `Message`)
//! - `model`: Conversation entity and title derivation
//! - `manager`: Active-conversation bookkeeping (`ConversationManager`)

mod manager;
mod manager_test;
mod message;
mod model;

// Re-export public API
pub use manager::{ConversationManager, DEFAULT_HISTORY_LIMIT};
pub use message::{Message, Role};
pub use model::{
    Conversation, ConversationId, ConversationSummary, DEFAULT_TITLE, TITLE_MAX_CHARS,
    derive_title,
};
