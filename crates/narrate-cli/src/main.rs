//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, sets up logging, bootstraps the speech
//! engine and dispatches to a handler.

use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use narrate_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; -v only changes the fallback.
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig {
        backend: cli.backend,
        voices_delay: Duration::from_millis(cli.voices_delay_ms),
    };
    let ctx = bootstrap(&config)?;

    match command {
        Commands::Read(args) => handlers::read::execute(&ctx, args).await?,
        Commands::Voices { json } => handlers::voices::execute(&ctx, json).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
