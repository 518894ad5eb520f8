//! Command-line adapter for modfetch.
//!
//! `bootstrap` composes the adapters; `handlers` run the commands.

#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use zip as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap, discover_module};
pub use commands::Commands;
pub use error::CliError;
pub use handlers::download::DownloadArgs;
pub use parser::Cli;
