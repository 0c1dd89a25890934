//! la-admin: command-line administration client for the local authority
//! backend.
//!
//! Each subcommand is one screen: it checks the stored session, calls the
//! backend through its own request client, and renders the result.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use cli::args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Config commands don't need a session or server, handle separately
    if let Commands::Config(cmd) = cli.command {
        return cli::commands::config::handle_config_command(cmd);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        cli::output::print_warning(&format!("Failed to load config file: {:#}", e));
        None
    });

    let token_flag = match &cli.command {
        Commands::Login { token } => token.as_deref(),
        _ => None,
    };
    let resolved = config::resolve_config(
        cli.profile.as_deref(),
        cli.server.as_deref(),
        token_flag,
        file_config,
    )?;

    let app = cli::App::new(resolved, config::session_path()?);

    if let Err(e) = cli::run_command(&app, cli.command).await {
        cli::output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
