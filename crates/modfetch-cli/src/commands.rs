//! Subcommand definitions.

use clap::Subcommand;

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download modules to the local cache.
    ///
    /// With no arguments, downloads every module needed to build the main
    /// module. Failures are reported per module; the exit status is 1 if
    /// any module failed.
    Download {
        /// Print each fetch stage as it runs
        #[arg(short = 'x')]
        trace: bool,

        /// Print one JSON object per module to standard output
        #[arg(long)]
        json: bool,

        /// Module paths, `path@version` queries or `path/...` patterns
        #[arg(value_name = "MODULES")]
        modules: Vec<String>,
    },

    /// Show resolved cache, proxy and module root locations
    Paths,
}
