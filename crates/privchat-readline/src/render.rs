//! Terminal output helpers.

use colored::{ColoredString, Colorize};
use privchat_core::completion::Usage;
use privchat_core::conversation::{ConversationSummary, Message, Role};
use privchat_core::settings::{Settings, Theme};

/// Soft limit on the length of one message, in characters.
pub const INPUT_CHAR_BUDGET: usize = 4000;

/// How close an input is to [`INPUT_CHAR_BUDGET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    /// Above 70%.
    Warning,
    /// Above 90%.
    Critical,
}

pub fn budget_level(chars: usize) -> Option<BudgetLevel> {
    if chars * 10 > INPUT_CHAR_BUDGET * 9 {
        Some(BudgetLevel::Critical)
    } else if chars * 10 > INPUT_CHAR_BUDGET * 7 {
        Some(BudgetLevel::Warning)
    } else {
        None
    }
}

pub fn budget_notice(chars: usize) -> Option<ColoredString> {
    let text = format!("{chars}/{INPUT_CHAR_BUDGET} characters");
    match budget_level(chars)? {
        BudgetLevel::Warning => Some(text.yellow()),
        BudgetLevel::Critical => Some(text.red()),
    }
}

/// Colors for the current theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    theme: Theme,
}

impl Palette {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn user(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.green(),
            Theme::Dark => text.bright_green(),
        }
    }

    pub fn assistant(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.blue(),
            Theme::Dark => text.bright_blue(),
        }
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        text.bright_black()
    }

    pub fn message(&self, message: &Message) -> String {
        let time = message.timestamp().format("%H:%M");
        let prefix = match message.role() {
            Role::User => "you",
            _ => "ai",
        };
        let header = self.muted(&format!("[{time}] {prefix}"));
        let body = match message.role() {
            Role::User => self.user(message.content()),
            _ => self.assistant(message.content()),
        };
        format!("{header}\n{body}")
    }
}

pub fn usage_line(usage: &Usage) -> String {
    format!(
        "Tokens: {} (estimated cost ${:.4})",
        usage.total_tokens,
        usage.estimated_cost()
    )
}

pub fn conversation_line(summary: &ConversationSummary) -> String {
    let marker = if summary.active { "*" } else { " " };
    let short_id: String = summary.id.chars().take(8).collect();
    format!(
        "{marker} {short_id}  {}  ({} messages)",
        summary.title, summary.message_count
    )
}

/// Settings summary; keys are shown masked.
pub fn settings_lines(settings: &Settings) -> Vec<String> {
    let mut lines = vec![
        format!("model:         {}", settings.model),
        format!("temperature:   {}", settings.temperature),
        format!("max tokens:    {}", settings.max_tokens),
        format!("system prompt: {}", settings.system_prompt),
        format!("token usage:   {}", on_off(settings.toggles.show_token_usage)),
    ];
    if settings.credentials.is_empty() {
        lines.push("api keys:      none".to_string());
    }
    for (provider, key) in &settings.credentials {
        lines.push(format!("api key:       {provider} {}", mask(key)));
    }
    lines
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Shows the first three and last four characters of a key.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
