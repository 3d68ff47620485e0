//! `fob-deploy` binary entry point.

use clap::Parser;
use fob_deploy_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Detect(detect_args) => commands::detect_execute(detect_args).await,
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args).await,
        cli::Command::Output(output_args) => commands::output_execute(output_args).await,
        cli::Command::Targets(targets_args) => commands::targets_execute(targets_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
