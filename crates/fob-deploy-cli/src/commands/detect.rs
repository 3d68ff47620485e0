//! `fob-deploy detect`

use fob_deploy::{Detector, Runtime};
use serde_json::json;

use crate::cli::DetectArgs;
use crate::commands::print_json;
use crate::error::Result;
use crate::ui;

/// Print the target the detector picks for this process.
pub async fn execute(args: DetectArgs) -> Result<()> {
    let detection = Detector::new().detect(&Runtime::current());

    if args.json {
        return print_json(&json!({
            "target": detection.target.id(),
            "package": detection.target.package(),
            "signal": detection.signal.to_string(),
        }));
    }

    ui::info(&format!("Detected from {}", detection.signal));
    println!("{}", detection.target);
    Ok(())
}
