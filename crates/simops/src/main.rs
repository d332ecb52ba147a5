//! `simops` binary entry point.
//!
//! Wires config, session persistence, and the API client together,
//! then dispatches to the command handlers.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simops_api::{ApiClient, Session};

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let conf = config::load_config()?;
    let base_url = config::resolve_base_url(&cli.global, &conf)?;

    let session = Arc::new(Session::new());
    if let Some(snapshot) = config::load_session() {
        session.restore(snapshot);
    }

    let client = ApiClient::new(base_url, Arc::clone(&session))?;
    client.set_scope(config::resolve_scope(&cli.global, &conf));

    let result = match cli.command {
        Command::Login(args) => commands::login::login(&client, args, &cli.global).await,
        Command::Logout => commands::login::logout(&client, &cli.global).await,
        Command::Overview(args) => commands::overview::handle(&client, args, &cli.global).await,
        Command::Instances(args) => commands::instances::handle(&client, args, &cli.global).await,
        Command::Endpoints(args) => commands::endpoints::handle(&client, args, &cli.global).await,
        Command::Usage(args) => commands::usage::handle(&client, args, &cli.global).await,
        Command::Export(args) => commands::export::handle(&client, args, &cli.global).await,
    };

    // Rejected credentials tear the in-memory session down; drop the
    // stale session file so the next invocation prompts for login.
    if !session.is_authenticated() {
        config::clear_session();
    }

    result
}
