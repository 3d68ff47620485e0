//! Subcommand implementations. Each module exposes an `execute` function
//! taking the parsed arguments.
//!
//! Commands print their result on stdout (one line, or JSON with `--json`)
//! and status lines on stderr.

pub mod detect;
pub mod output;
pub mod resolve;
pub mod targets;

pub use detect::execute as detect_execute;
pub use output::execute as output_execute;
pub use resolve::execute as resolve_execute;
pub use targets::execute as targets_execute;

use std::path::PathBuf;

use crate::error::Result;

pub(crate) fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
