//! rustyline helper: slash-command completion, hints and highlighting.

use crate::commands::{COMMANDS, MULTI_CONVERSATION_COMMANDS};
use colored::Colorize;
use privchat_core::Provider;
use privchat_core::profile::Capabilities;
use privchat_interaction::supported_models::SUGGESTED_MODELS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<&'static str>,
    providers: Vec<&'static str>,
}

impl CliHelper {
    pub fn new(capabilities: &Capabilities) -> Self {
        let commands = COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| {
                capabilities.multi_conversation || !MULTI_CONVERSATION_COMMANDS.contains(name)
            })
            .collect();
        let providers = if capabilities.multi_provider {
            Provider::ALL.iter().map(Provider::as_str).collect()
        } else {
            Vec::new()
        };
        Self {
            commands,
            providers,
        }
    }

    fn argument_candidates(&self, command: &str) -> Vec<&'static str> {
        match command {
            "/model" => SUGGESTED_MODELS.to_vec(),
            "/key" => self.providers.clone(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let to_pair = |candidate: &&str| Pair {
            display: candidate.to_string(),
            replacement: candidate.to_string(),
        };

        match line.split_once(' ') {
            None => Ok((
                0,
                self.commands
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .map(to_pair)
                    .collect(),
            )),
            Some((command, arg)) if !arg.contains(' ') => {
                let start = command.len() + 1;
                let candidates = self
                    .argument_candidates(command)
                    .iter()
                    .filter(|candidate| candidate.starts_with(arg))
                    .map(to_pair)
                    .collect();
                Ok((start, candidates))
            }
            Some(_) => Ok((0, vec![])),
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}
