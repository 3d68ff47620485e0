//! Output (rendering) mode selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::env::{Runtime, OUTPUT_MODE_ENV_VAR};
use crate::error::Error;
use crate::target::BuiltinTarget;

/// How pages are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Pre-rendered at build time
    #[default]
    Static,
    /// Rendered on demand per request
    Server,
    /// Legacy mixed mode. Accepted as input only; selection returns
    /// [`OutputMode::Static`], which now allows per-page opt-out.
    Hybrid,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Server => "server",
            Self::Hybrid => "hybrid",
        }
    }

    /// Map the legacy `hybrid` value onto its modern equivalent.
    pub fn normalize(self) -> Self {
        match self {
            Self::Hybrid => Self::Static,
            mode => mode,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "server" => Ok(Self::Server),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Pick the output mode for an already-determined target identifier.
///
/// Static-only aliases always yield [`OutputMode::Static`]. Otherwise the
/// explicit `requested` mode wins, then `ASTRO_OUTPUT_MODE`, then the default.
/// Unparseable environment values are ignored with a warning.
pub fn select_output_mode(
    target: &str,
    requested: Option<OutputMode>,
    runtime: &Runtime,
) -> OutputMode {
    if let Some(builtin) = BuiltinTarget::from_id(target).filter(|t| t.is_static_only()) {
        debug!(target_id = builtin.id(), "static-only target forces static output");
        return OutputMode::Static;
    }

    let mode = requested
        .or_else(|| mode_from_env(runtime))
        .unwrap_or_default();
    if mode == OutputMode::Hybrid {
        debug!("output mode \"hybrid\" is deprecated, using \"static\"");
    }
    mode.normalize()
}

fn mode_from_env(runtime: &Runtime) -> Option<OutputMode> {
    let raw = runtime.get_env_non_empty(OUTPUT_MODE_ENV_VAR)?;
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(_) => {
            warn!(
                "Ignoring {}={:?}: expected static, server or hybrid",
                OUTPUT_MODE_ENV_VAR, raw
            );
            None
        }
    }
}
