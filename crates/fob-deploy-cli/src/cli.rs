//! Command-line interface definition.
//!
//! - `fob-deploy detect` - print the auto-detected target
//! - `fob-deploy resolve` - resolve and configure an adapter
//! - `fob-deploy output` - print the selected output mode
//! - `fob-deploy targets` - list built-in targets

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fob_deploy::OutputMode;

/// Resolve deployment adapters for Fob builds
#[derive(Parser, Debug)]
#[command(
    name = "fob-deploy",
    version,
    about = "Detect the hosting platform and resolve its deployment adapter",
    long_about = "fob-deploy works out which hosting platform a build targets, either from\n\
                  an explicit identifier, the ASTRO_ADAPTER_MODE variable, or platform\n\
                  detection, and prints the adapter integration and output mode to use."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the auto-detected target identifier
    ///
    /// Only runtime signals are consulted; ASTRO_ADAPTER_MODE is ignored.
    Detect(DetectArgs),

    /// Resolve the adapter integration for a target
    ///
    /// Without TARGET the identifier comes from ASTRO_ADAPTER_MODE, then the
    /// config file, then platform detection.
    Resolve(ResolveArgs),

    /// Print the output mode for a target
    ///
    /// --mode wins, then ASTRO_OUTPUT_MODE, then the config file's output.
    Output(OutputArgs),

    /// List built-in targets and their adapter packages
    Targets(TargetsArgs),
}

/// Arguments shared by commands that read `fob-deploy.toml`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a config file (default: ./fob-deploy.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to start node_modules lookup from
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Print a JSON object instead of the bare identifier
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Target identifier, built-in or registered in the config file
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the resolution and the config produced by the
    /// `astro:config:setup` hook as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Target identifier
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Requested output mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

/// Output mode as accepted on the command line.
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Mode {
    /// Pre-render every page at build time
    Static,
    /// Render pages on demand
    Server,
    /// Deprecated, treated as static
    Hybrid,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Static => OutputMode::Static,
            Mode::Server => OutputMode::Server,
            Mode::Hybrid => OutputMode::Hybrid,
        }
    }
}
