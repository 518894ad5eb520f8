//! CLI entry point.
//!
//! Wiring happens in `bootstrap`; this file parses arguments, sets up
//! logging and maps results to exit codes.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use modfetch_cli::{Cli, CliConfig, CliError, Commands, DownloadArgs, bootstrap, handlers};

fn init_tracing(trace: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if trace { "warn,modfetch=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(true);
    };

    let ctx = bootstrap(CliConfig::new(cli.cache_dir, cli.proxy_dir))?;

    match command {
        Commands::Download { json, modules, .. } => {
            handlers::download::execute(&ctx, &DownloadArgs { json, modules }).await
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx)?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.trace_enabled());

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("modfetch: {e}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
