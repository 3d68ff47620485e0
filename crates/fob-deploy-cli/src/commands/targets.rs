//! `fob-deploy targets`

use fob_deploy::BuiltinTarget;
use serde_json::{json, Value};

use crate::cli::TargetsArgs;
use crate::commands::print_json;
use crate::error::Result;

/// List built-in targets.
pub async fn execute(args: TargetsArgs) -> Result<()> {
    if args.json {
        let rows: Vec<Value> = BuiltinTarget::ALL.iter().map(|t| row(*t)).collect();
        return print_json(&Value::Array(rows));
    }

    let width = BuiltinTarget::ALL
        .iter()
        .map(|t| t.id().len())
        .max()
        .unwrap_or_default();
    for target in BuiltinTarget::ALL {
        let mut line = format!("{:<width$}  {}", target.id(), target.package());
        if let Some(replacement) = target.replacement() {
            line.push_str(&format!("  (deprecated, use {replacement})"));
        }
        if target.is_static_only() {
            line.push_str("  [static only]");
        }
        println!("{line}");
    }
    Ok(())
}

fn row(target: BuiltinTarget) -> Value {
    json!({
        "id": target.id(),
        "package": target.package(),
        "deprecated": target.is_deprecated(),
        "replacement": target.replacement().map(BuiltinTarget::id),
        "staticOnly": target.is_static_only(),
        "defaults": target.default_options(),
    })
}
