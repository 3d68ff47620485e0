//! Command-line front end for [`fob_deploy`].
//!
//! - [`cli`] - argument definitions
//! - [`config`] - `fob-deploy.toml` / environment / flag layering
//! - [`commands`] - one module per subcommand
//! - [`error`] - CLI error types and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use config::{ConfigOverrides, DeployConfig};
pub use error::{CliError, ConfigError, Result};
