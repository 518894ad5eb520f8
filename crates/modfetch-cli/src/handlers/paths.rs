//! Paths command handler.
//!
//! Displays resolved locations for diagnosing where modules end up.

use std::io::Write;

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Write resolved paths in `key = value` format.
pub fn execute_to<W: Write>(ctx: &CliContext, mut out: W) -> Result<()> {
    writeln!(out, "{}", ctx.paths)?;
    match &ctx.module.main {
        Some(main) => writeln!(out, "module = {} ({})", main.path, main.root.display())?,
        None => writeln!(out, "module = none")?,
    }
    writeln!(out, "mode = {}", ctx.module.mode)?;
    Ok(())
}

/// Execute the paths command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    execute_to(ctx, std::io::stdout())
}
