//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<...>`
//! - Thin wrappers that:
//!   1. Turn CLI arguments into a request
//!   2. Call `modfetch-download`
//!   3. Format output for the terminal
//!
//! Handlers hold no fetch logic of their own.

pub mod download;
pub mod paths;
