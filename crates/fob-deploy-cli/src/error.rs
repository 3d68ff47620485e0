//! Error types for the `fob-deploy` CLI.
//!
//! Library failures keep their [`miette::Diagnostic`] (code and help text)
//! all the way to the terminal; CLI-only failures are plain `thiserror`
//! enums rendered through [`cli_error_to_miette`].

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resolution engine failure
    #[error(transparent)]
    Deploy(#[from] fob_deploy::Error),

    /// A hook of the resolved integration returned an error
    #[error("Hook \"{hook}\" of {integration} failed: {message}")]
    Hook {
        integration: String,
        hook: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` pointed at a file that does not exist
    #[error("Config file not found: {}\n\nHint: Create fob-deploy.toml or pass an existing file to --config", .0.display())]
    NotFound(PathBuf),

    /// A layer could not be parsed or did not fit the schema
    #[error("{message}\n\nHint: Check fob-deploy.toml and FOB_DEPLOY_* variables")]
    Invalid { message: String },

    /// `options` / `register` tables did not form a valid options bag
    #[error("Invalid adapter options: {0}")]
    Options(#[source] fob_deploy::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Invalid {
            message: err.to_string(),
        }
    }
}

/// Convert a [`CliError`] into a report for `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Deploy(e) => Report::new(e),
        CliError::Config(ConfigError::Options(e)) => {
            Report::new(e).wrap_err("Invalid adapter options in configuration")
        }
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}
