//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface of the module downloader.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser, Debug)]
#[command(name = "modfetch")]
#[command(about = "Download modules into the local module cache")]
#[command(version)]
pub struct Cli {
    /// Override the module cache directory for this invocation
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<String>,

    /// Override the module proxy directory for this invocation
    #[arg(long = "proxy-dir", global = true)]
    pub proxy_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether stage-level tracing was requested.
    pub const fn trace_enabled(&self) -> bool {
        matches!(self.command, Some(Commands::Download { trace: true, .. }))
    }
}
