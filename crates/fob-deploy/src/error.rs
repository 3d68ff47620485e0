//! Error types for adapter resolution.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for adapter resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a deployment target
///
/// An unrecognized target identifier is not an error. It is reported as a
/// warning and resolution falls back to the default target.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A built-in target's adapter package could not be loaded
    #[error("Package \"{package}\" is not installed. Please install it with:\n{remedy}")]
    #[diagnostic(
        code(fob::deploy::missing_dependency),
        help("Adapter packages are optional peer dependencies; install the one for your platform")
    )]
    MissingDependency { package: String, remedy: String },

    /// A factory supplied through the `register` extension point failed
    #[error("Failed to create custom adapter \"{id}\": {source}")]
    #[diagnostic(
        code(fob::deploy::custom_factory),
        help("The error was raised by the factory registered for \"{id}\", not by fob-deploy")
    )]
    CustomFactory {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A built-in adapter package was loaded but its factory failed
    #[error("Adapter \"{package}\" failed to configure target \"{target}\": {source}")]
    #[diagnostic(code(fob::deploy::integration))]
    Integration {
        target: String,
        package: String,
        #[source]
        source: anyhow::Error,
    },

    /// Options for a built-in target are not a JSON object
    #[error("Options for target \"{target}\" must be an object, found {found}")]
    #[diagnostic(
        code(fob::deploy::invalid_options),
        help("Pass a table of options, e.g. {{ \"{target}\": {{ ... }} }}")
    )]
    InvalidOptions { target: String, found: &'static str },

    /// A rendering mode string is not one of `static`, `server`, `hybrid`
    #[error("Unknown output mode \"{0}\"")]
    #[diagnostic(
        code(fob::deploy::invalid_mode),
        help("Expected one of: static, server, hybrid")
    )]
    InvalidMode(String),

    /// The current directory could not be read, so there is nowhere to
    /// start the `node_modules` lookup
    #[error("Cannot read the current directory: {0}")]
    #[diagnostic(
        code(fob::deploy::working_directory),
        help("Run from an existing project directory, or use a Resolver with an explicit loader")
    )]
    WorkingDirectory(#[source] std::io::Error),
}

impl Error {
    /// Build a [`MissingDependency`](Self::MissingDependency) with the
    /// `pnpm add` remedy for `package`.
    pub fn missing_dependency(package: impl Into<String>) -> Self {
        let package = package.into();
        let remedy = format!("pnpm add {}", package);
        Self::MissingDependency { package, remedy }
    }

    pub fn custom_factory(id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::CustomFactory {
            id: id.into(),
            source,
        }
    }

    /// Identifier named by the error, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::CustomFactory { id, .. } => Some(id),
            Self::Integration { target, .. } | Self::InvalidOptions { target, .. } => Some(target),
            Self::MissingDependency { .. } | Self::InvalidMode(_) | Self::WorkingDirectory(_) => None,
        }
    }
}
