//! Download command handler.

use std::io::Write;

use anyhow::Result;

use modfetch_download::{DownloadRequest, download_modules};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Prefix for lines written to the error stream.
const PREFIX: &str = "modfetch: ";

/// Arguments of the download command.
#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Emit JSON records instead of error lines.
    pub json: bool,
    /// Patterns as given on the command line.
    pub modules: Vec<String>,
}

/// Run a download and write its report.
///
/// Returns `Ok(false)` when at least one module failed. Run-level failures
/// are returned as [`CliError`].
pub async fn execute_to<O: Write, E: Write>(
    ctx: &CliContext,
    args: &DownloadArgs,
    mut out: O,
    mut err: E,
) -> Result<bool> {
    let request = DownloadRequest::new(ctx.module.clone(), args.modules.clone())
        .with_concurrency(ctx.concurrency);
    let report = download_modules(&ctx.deps, &request)
        .await
        .map_err(CliError::from)?;

    for notice in &report.notices {
        writeln!(err, "{PREFIX}{notice}")?;
    }

    if args.json {
        report.write_json(&mut out)?;
    } else {
        report.write_errors(&mut err, PREFIX)?;
    }

    if report.failed() {
        tracing::debug!(
            target: "modfetch.cli",
            failed = report.failure_count(),
            total = report.outcomes.len(),
            "download finished with failures"
        );
    }
    Ok(!report.failed())
}

/// Execute the download command against stdout and stderr.
pub async fn execute(ctx: &CliContext, args: &DownloadArgs) -> Result<bool> {
    execute_to(ctx, args, std::io::stdout(), std::io::stderr()).await
}
