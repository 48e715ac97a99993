//! Parsing of REPL input into commands.

use privchat_core::Provider;

/// Something the user asked for on one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text to send to the model.
    Chat(String),
    New,
    List,
    Switch(String),
    Rename(String),
    Delete(String),
    Clear,
    /// `None` means the default (OpenAI) provider.
    Key {
        provider: Option<Provider>,
        key: String,
    },
    Model(String),
    /// An empty prompt restores the profile default.
    System(String),
    Temp(f64),
    Validate,
    Theme,
    Settings,
    Help,
    Quit,
}

/// Names offered for completion, with a usage line each.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/new", "/new                  start a new conversation"),
    ("/list", "/list                 list conversations"),
    ("/switch", "/switch <id-prefix>   switch conversation"),
    ("/rename", "/rename <title>       rename the current conversation"),
    ("/delete", "/delete <id-prefix>   delete a conversation"),
    ("/clear", "/clear                clear the current conversation"),
    ("/key", "/key [provider] <key> store an API key"),
    ("/model", "/model <id>           select the model"),
    ("/system", "/system [prompt]      set or reset the system prompt"),
    ("/temp", "/temp <0.0-2.0>       set the temperature"),
    ("/validate", "/validate             check the stored OpenAI key"),
    ("/theme", "/theme                toggle light/dark"),
    ("/settings", "/settings             show current settings"),
    ("/help", "/help                 show this help"),
];

/// Commands that only make sense with several conversations.
pub const MULTI_CONVERSATION_COMMANDS: &[&str] = &["/list", "/switch", "/rename", "/delete"];

/// Parses one trimmed, non-empty input line.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }
    if !line.starts_with('/') {
        return Ok(Command::Chat(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/new" => Command::New,
        "/list" => Command::List,
        "/switch" => Command::Switch(required(rest, "/switch <id-prefix>")?),
        "/rename" => Command::Rename(required(rest, "/rename <title>")?),
        "/delete" => Command::Delete(required(rest, "/delete <id-prefix>")?),
        "/clear" => Command::Clear,
        "/key" => parse_key(rest)?,
        "/model" => Command::Model(required(rest, "/model <id>")?),
        "/system" => Command::System(rest.to_string()),
        "/temp" => {
            let value = required(rest, "/temp <0.0-2.0>")?;
            let temperature = value
                .parse::<f64>()
                .map_err(|_| format!("'{value}' is not a number"))?;
            Command::Temp(temperature)
        }
        "/validate" => Command::Validate,
        "/theme" => Command::Theme,
        "/settings" => Command::Settings,
        "/help" => Command::Help,
        other => return Err(format!("Unknown command '{other}'. Type /help for a list.")),
    };
    Ok(command)
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_key(rest: &str) -> Result<Command, String> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), None, None) => Ok(Command::Key {
            provider: None,
            key: key.to_string(),
        }),
        (Some(provider), Some(key), None) => {
            let provider = provider.parse::<Provider>().map_err(|e| e.to_string())?;
            Ok(Command::Key {
                provider: Some(provider),
                key: key.to_string(),
            })
        }
        _ => Err("Usage: /key [provider] <key>".to_string()),
    }
}
