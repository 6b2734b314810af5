//! Upvote CLI - browse, submit, and vote on feature requests from the terminal

mod cli;
mod commands;
mod error;


use std::env;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use upvote_core::sync::{ScopeToken, ViewScope};

use crate::cli::{Cli, Commands};
use crate::commands::common::{
    load_config, open_service, resolve_config_path, resolve_db_path, AppService,
};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::health::run_health;
use crate::commands::list::run_list;
use crate::commands::local::{run_device, run_reset, run_voted};
use crate::commands::new::run_new;
use crate::commands::show::run_show;
use crate::commands::stats::run_stats;
use crate::commands::vote::run_vote;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell, output } = &command {
        return run_completions(*shell, output.as_deref());
    }

    let config_path = resolve_config_path(cli.config);
    let config = load_config(&config_path, cli.api_url, |key| env::var(key).ok())?;
    let service = open_service(&resolve_db_path(cli.db_path), &config)?;

    let scope = ViewScope::new();
    let token = scope.token();
    tokio::select! {
        result = dispatch(command, &service, &token) => result,
        _ = tokio::signal::ctrl_c() => {
            scope.cancel();
            Err(CliError::Interrupted)
        }
    }
}

async fn dispatch(
    command: Commands,
    service: &AppService,
    token: &ScopeToken,
) -> Result<(), CliError> {
    match command {
        Commands::List { refresh, json } => run_list(service, refresh, json, token).await,
        Commands::Show { id, json } => run_show(service, &id, json, token).await,
        Commands::New { title, description } => {
            run_new(service, &title, &description, token).await
        }
        Commands::Edit {
            id,
            title,
            description,
        } => run_edit(service, &id, title, description, token).await,
        Commands::Delete { id } => run_delete(service, &id, token).await,
        Commands::Vote { id } => run_vote(service, &id, true, token).await,
        Commands::Unvote { id } => run_vote(service, &id, false, token).await,
        Commands::Stats { id, json } => run_stats(service, &id, json, token).await,
        Commands::Voted { json } => run_voted(service, json).await,
        Commands::Device { label, clear } => run_device(service, label.as_deref(), clear).await,
        Commands::Reset => run_reset(service).await,
        Commands::Health => run_health(service, token).await,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}
