//! docent CLI entry point.
//!
//! Binary name: `docent`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! appropriate command handler: the interactive ask loop, index
//! rebuilding, retrieval debugging, or the status view.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,docent=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "docent", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration (explicit path, ./docent.toml, or defaults)
    let state = AppState::init(cli.config.as_deref())?;

    match cli.command {
        Commands::Ask { question } => match question {
            Some(q) => cli::ask::ask_once(&state, &q).await?,
            None => cli::ask::run_ask_loop(&state).await?,
        },

        Commands::Index => {
            cli::index::rebuild_index(&state).await?;
        }

        Commands::Search { query, top_k } => {
            cli::search::search(&state, &query, top_k, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
