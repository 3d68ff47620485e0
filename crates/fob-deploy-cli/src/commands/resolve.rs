//! `fob-deploy resolve`

use fob_deploy::{hooks, HookContext, Outcome, Resolution, Runtime};
use serde_json::{json, Value};

use crate::cli::ResolveArgs;
use crate::commands::{current_dir, print_json};
use crate::config::DeployConfig;
use crate::error::{CliError, Result};
use crate::ui;

/// Resolve and report the adapter integration.
///
/// With `--json` the integration's `astro:config:setup` hook is run against
/// an empty config and the resulting document is printed.
pub async fn execute(args: ResolveArgs) -> Result<()> {
    let cwd = current_dir()?;
    let config = DeployConfig::from_args(&cwd, &args.config)?;
    let loader = config.loader(&cwd);
    let options = config.adapter_options(loader)?;

    let target = config.requested_target(args.target.as_deref(), &Runtime::current());
    let resolution = config
        .resolver(&cwd)
        .resolve_detailed(target.as_deref(), &options)
        .await?;

    if args.json {
        let setup = run_config_setup(&resolution)?;
        return print_json(&json!({
            "requested": resolution.requested,
            "outcome": outcome_label(&resolution.outcome),
            "integration": resolution.integration.name(),
            "hooks": resolution.integration.hook_names().collect::<Vec<_>>(),
            "config": setup,
        }));
    }

    match resolution.outcome {
        Outcome::Custom => ui::success(&format!(
            "Resolved custom target \"{}\"",
            resolution.requested
        )),
        Outcome::Builtin(target) => ui::success(&format!("Resolved built-in target \"{target}\"")),
        Outcome::Defaulted => ui::warning(&format!(
            "\"{}\" is not a known target, using node",
            resolution.requested
        )),
    }
    for hook in resolution.integration.hook_names() {
        ui::detail(hook);
    }
    println!("{}", resolution.integration.name());
    Ok(())
}

fn run_config_setup(resolution: &Resolution) -> Result<Value> {
    let integration = &resolution.integration;
    let mut ctx = HookContext::default();
    integration
        .run_hook(hooks::CONFIG_SETUP, &mut ctx)
        .map_err(|e| CliError::Hook {
            integration: integration.name().to_string(),
            hook: hooks::CONFIG_SETUP.to_string(),
            message: format!("{e:#}"),
        })?;
    Ok(ctx.into_config())
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Custom => "custom",
        Outcome::Builtin(_) => "builtin",
        Outcome::Defaulted => "default",
    }
}
