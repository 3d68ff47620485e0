//! `fob-deploy.toml` configuration.
//!
//! Sources are layered with figment, later layers winning:
//! defaults < config file < `FOB_DEPLOY_*` environment < command-line flags.
//!
//! ```toml
//! target = "railway"
//! output = "server"
//!
//! [options.node]
//! mode = "middleware"
//!
//! [options.railway]
//! region = "eu-west"
//!
//! [register]
//! railway = "astro-railway-adapter"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use fob_deploy::{
    AdapterOptions, NodeModulesLoader, OutputMode, PackageLoader, Resolver, Runtime,
    ADAPTER_ENV_VAR, OUTPUT_MODE_ENV_VAR, REGISTER_KEY,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cli::ConfigArgs;
use crate::error::{ConfigError, Result};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "fob-deploy.toml";

/// Prefix of environment variables that override config keys.
pub const ENV_PREFIX: &str = "FOB_DEPLOY_";

/// Project configuration for `fob-deploy`.
///
/// Every field is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Target identifier used when neither the command line nor
    /// `ASTRO_ADAPTER_MODE` names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Output mode used when neither `--mode` nor `ASTRO_OUTPUT_MODE`
    /// names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputMode>,

    /// Directory where node_modules lookup starts, relative to the working
    /// directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Per-target adapter options
    pub options: IndexMap<String, Value>,

    /// Custom identifier → package providing its factory
    pub register: IndexMap<String, String>,
}

/// Values taken from command-line flags. Unset fields leave lower layers
/// alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl From<&ConfigArgs> for ConfigOverrides {
    fn from(args: &ConfigArgs) -> Self {
        Self {
            root: args.root.clone(),
        }
    }
}

impl DeployConfig {
    /// Load configuration for a project rooted at `cwd`.
    ///
    /// An explicit `config_path` must exist; the default `fob-deploy.toml`
    /// is optional.
    ///
    /// # Arguments
    ///
    /// * `cwd` - Project directory; relative paths are joined onto it
    /// * `config_path` - Value of `--config`, if given
    /// * `overrides` - Command-line values layered over everything else
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use fob_deploy_cli::{ConfigOverrides, DeployConfig};
    ///
    /// let config = DeployConfig::load(Path::new("."), None, ConfigOverrides::default())?;
    /// println!("{:?}", config.target);
    /// # Ok::<(), fob_deploy_cli::CliError>(())
    /// ```
    pub fn load(cwd: &Path, config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let path = cwd.join(CONFIG_FILE);
                path.is_file().then_some(path)
            }
        };

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides));

        let config = figment.extract().map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load using the flags shared by every config-reading command.
    pub fn from_args(cwd: &Path, args: &ConfigArgs) -> Result<Self> {
        Self::load(cwd, args.config.as_deref(), ConfigOverrides::from(args))
    }

    /// Where node_modules lookup starts.
    pub fn package_root(&self, cwd: &Path) -> PathBuf {
        match &self.root {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }

    /// Loader reading `node_modules` from [`package_root`](Self::package_root).
    pub fn loader(&self, cwd: &Path) -> Arc<dyn PackageLoader> {
        Arc::new(NodeModulesLoader::new(self.package_root(cwd)))
    }

    /// A resolver for the current process configured from this file.
    pub fn resolver(&self, cwd: &Path) -> Resolver {
        Resolver::new(self.loader(cwd))
    }

    /// Build the options bag; every `register` entry becomes a factory
    /// that loads its package through `loader` when resolved.
    pub fn adapter_options(&self, loader: Arc<dyn PackageLoader>) -> Result<AdapterOptions> {
        let mut bag: serde_json::Map<String, Value> = self
            .options
            .iter()
            .map(|(id, options)| (id.clone(), options.clone()))
            .collect();
        let register = self
            .register
            .iter()
            .map(|(id, package)| (id.clone(), Value::String(package.clone())))
            .collect();
        bag.insert(REGISTER_KEY.to_string(), Value::Object(register));

        AdapterOptions::from_value(Value::Object(bag), loader)
            .map_err(|e| ConfigError::Options(e).into())
    }

    /// Identifier to hand to the resolver.
    ///
    /// A command-line target wins. Otherwise the config file's `target` is
    /// used unless `ASTRO_ADAPTER_MODE` is set, which the resolver reads
    /// itself.
    pub fn requested_target(&self, cli_target: Option<&str>, runtime: &Runtime) -> Option<String> {
        if let Some(target) = cli_target {
            return Some(target.to_string());
        }
        if runtime.get_env_non_empty(ADAPTER_ENV_VAR).is_some() {
            return None;
        }
        self.target.clone()
    }

    /// Output mode to hand to the selector.
    ///
    /// Ranked like [`requested_target`](Self::requested_target): `--mode`
    /// wins, then `ASTRO_OUTPUT_MODE` (read by the selector itself), then
    /// the config's `output`.
    pub fn requested_output(&self, cli_mode: Option<OutputMode>, runtime: &Runtime) -> Option<OutputMode> {
        if cli_mode.is_some() {
            return cli_mode;
        }
        if runtime.get_env_non_empty(OUTPUT_MODE_ENV_VAR).is_some() {
            return None;
        }
        self.output
    }
}
