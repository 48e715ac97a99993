//! Results of outbound chat requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text substituted when the provider answers successfully but without content.
pub const NO_RESPONSE_SENTINEL: &str = "No response received";

/// USD per 1000 tokens used for the rough cost estimate shown to the user.
pub const ESTIMATED_COST_PER_1K_TOKENS: f64 = 0.002;

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub total_tokens: u32,
}

impl Usage {
    /// Rough cost estimate in USD.
    pub fn estimated_cost(&self) -> f64 {
        f64::from(self.total_tokens) / 1000.0 * ESTIMATED_COST_PER_1K_TOKENS
    }
}

/// Assistant text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Usage>,
}

/// Lifecycle of the request for one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_sending(&self) -> bool {
        matches!(self, RequestState::Sending)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestState::Idle => "Ready",
            RequestState::Sending => "Thinking...",
            RequestState::Succeeded => "Ready",
            RequestState::Failed => "Error occurred",
        };
        f.write_str(label)
    }
}
