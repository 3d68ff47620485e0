//! `fob-deploy output`

use fob_deploy::Runtime;

use crate::cli::OutputArgs;
use crate::commands::current_dir;
use crate::config::DeployConfig;
use crate::error::Result;

/// Print the output mode for the requested target.
pub async fn execute(args: OutputArgs) -> Result<()> {
    let cwd = current_dir()?;
    let config = DeployConfig::from_args(&cwd, &args.config)?;

    let runtime = Runtime::current();
    let target = config.requested_target(args.target.as_deref(), &runtime);
    let requested = config.requested_output(args.mode.map(Into::into), &runtime);
    let mode = config
        .resolver(&cwd)
        .with_runtime(runtime)
        .select_mode(target.as_deref(), requested);
    println!("{mode}");
    Ok(())
}
