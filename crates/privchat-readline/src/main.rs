//! `privchat`: a terminal chat client for OpenAI-compatible APIs.

mod commands;
mod helper;
mod logging;
mod render;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use privchat_application::ChatContext;
use privchat_core::profile::Profile;
use privchat_infrastructure::{ConfigService, PrivchatPaths};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "privchat")]
#[command(about = "Privacy-first chat client for OpenAI-compatible APIs", long_about = None)]
struct Args {
    /// Profile to run as: minimal, standard or pro
    #[arg(long)]
    profile: Option<Profile>,

    /// Directory holding config.toml and the durable store
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Directory for logs
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigService::new(args.config_dir)
        .load()
        .context("Failed to load configuration")?;
    if let Some(profile) = args.profile {
        config.profile = profile;
    }
    if args.data_dir.is_some() {
        config.data_dir = args.data_dir;
    }

    let paths = PrivchatPaths::new(config.config_dir.as_deref(), config.data_dir.as_deref())?;
    let _log_guard = logging::init(&paths.logs_dir(), &config.log_filter)?;
    tracing::info!(profile = %config.profile, "Starting privchat");

    let context = ChatContext::bootstrap(config).await?;
    let outcome = repl::run(&context).await;
    context.shutdown().await?;
    outcome
}
