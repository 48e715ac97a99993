//! The interactive loop.

use crate::commands::{self, COMMANDS, Command};
use crate::helper::CliHelper;
use crate::render::{self, Palette};
use anyhow::Result;
use colored::Colorize;
use privchat_application::{ChatContext, CredentialUpdate};
use privchat_core::Provider;
use privchat_core::completion::RequestState;
use privchat_interaction::Validation;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use std::io::Write;

enum Flow {
    Continue,
    Quit,
}

pub async fn run(context: &ChatContext) -> Result<()> {
    let mut palette = Palette::new(context.theme().await);

    println!(
        "{}",
        format!("=== privchat ({}) ===", context.profile()).bright_magenta().bold()
    );
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    for warning in context.warnings() {
        println!("{}", warning.yellow());
    }
    greet(context).await;
    println!();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(context.capabilities())));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match commands::parse(trimmed) {
                    Ok(command) => {
                        if let Flow::Quit = execute(context, command, &mut palette).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Err(message) => println!("{}", message.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Tells the user whether chatting is possible yet.
async fn greet(context: &ChatContext) {
    let settings = context.settings().await;
    if !settings.has_credential(Provider::OpenAi) {
        println!("{}", "Enter your OpenAI API key with '/key <key>'.".yellow());
        return;
    }
    if context.capabilities().credential_validation && settings.toggles.validate_on_save {
        print_validation(&context.validate_credential().await);
    }
}

async fn execute(context: &ChatContext, command: Command, palette: &mut Palette) -> Flow {
    let result = match command {
        Command::Quit => return Flow::Quit,
        Command::Chat(text) => {
            chat(context, &text, palette).await;
            Ok(())
        }
        Command::Help => {
            print_help(context);
            Ok(())
        }
        Command::New => context.new_conversation().await.map(|id| {
            println!("{}", format!("Started conversation {}", short(&id)).green());
        }),
        Command::List => context.list_conversations().await.map(|summaries| {
            for summary in summaries {
                println!("{}", render::conversation_line(&summary));
            }
        }),
        Command::Switch(prefix) => match context.switch_conversation(&prefix).await {
            Ok(id) => {
                println!("{}", format!("Switched to {}", short(&id)).green());
                for message in context.history().await {
                    println!("{}", palette.message(&message));
                }
                Ok(())
            }
            Err(err) => Err(err),
        },
        Command::Rename(title) => context
            .rename_conversation(&title)
            .await
            .map(|()| println!("{}", "Conversation renamed".green())),
        Command::Delete(prefix) => context
            .delete_conversation(&prefix)
            .await
            .map(|()| println!("{}", "Conversation deleted".green())),
        Command::Clear => context
            .clear_conversation()
            .await
            .map(|()| println!("{}", "Chat cleared".green())),
        Command::Key { provider, key } => {
            let provider = provider.unwrap_or(Provider::OpenAi);
            match context.set_credential(provider, &key).await {
                Ok(CredentialUpdate::Saved { validation }) => {
                    println!("{}", format!("{provider} key saved").green());
                    if let Some(validation) = validation {
                        print_validation(&validation);
                    }
                    Ok(())
                }
                Ok(CredentialUpdate::Rejected(reason)) => {
                    println!("{}", reason.red());
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }
        Command::Model(model) => context
            .set_model(&model)
            .await
            .map(|()| println!("{}", format!("Model set to {model}").green())),
        Command::System(prompt) => context
            .set_system_prompt(&prompt)
            .await
            .map(|()| println!("{}", "System prompt updated".green())),
        Command::Temp(value) => context
            .set_temperature(value)
            .await
            .map(|()| println!("{}", format!("Temperature set to {value}").green())),
        Command::Validate => {
            print_validation(&context.validate_credential().await);
            Ok(())
        }
        Command::Theme => context.toggle_theme().await.map(|theme| {
            *palette = Palette::new(theme);
            println!("{}", format!("Theme: {theme}").green());
        }),
        Command::Settings => {
            let settings = context.settings().await;
            for line in render::settings_lines(&settings) {
                println!("{}", line.bright_black());
            }
            println!("{}", format!("theme:         {}", context.theme().await).bright_black());
            Ok(())
        }
    };

    if let Err(err) = result {
        println!("{}", err.to_string().red());
    }
    Flow::Continue
}

async fn chat(context: &ChatContext, text: &str, palette: &Palette) {
    if let Some(notice) = render::budget_notice(text.chars().count()) {
        println!("{notice}");
    }

    print!("{}", RequestState::Sending.to_string().bright_black());
    let _ = std::io::stdout().flush();
    let outcome = context.submit(text).await;
    // Erase the indicator line.
    print!("\r\x1b[2K");

    match outcome {
        Ok(outcome) => {
            if outcome.is_error() {
                println!("{}", outcome.reply.red());
                println!("{}", context.request_state().await.to_string().bright_black());
                return;
            }
            println!("{}", palette.assistant(&outcome.reply));
            if let Some(usage) = outcome.usage {
                if context.settings().await.toggles.show_token_usage {
                    println!("{}", palette.muted(&render::usage_line(&usage)));
                }
            }
        }
        Err(err) => println!("{}", err.to_string().yellow()),
    }
}

fn print_validation(validation: &Validation) {
    match validation {
        Validation::Valid => println!("{}", format!("✅ {validation}").green()),
        Validation::Invalid(_) => println!("{}", format!("❌ {validation}").red()),
    }
}

fn print_help(context: &ChatContext) {
    let multi = context.capabilities().multi_conversation;
    for (name, usage) in COMMANDS {
        if multi || !commands::MULTI_CONVERSATION_COMMANDS.contains(name) {
            println!("  {}", usage.bright_black());
        }
    }
    println!("  {}", "quit | exit           leave (session data is cleared)".bright_black());
}

fn short(id: &str) -> String {
    id.chars().take(8).collect()
}
