//! # fob-deploy
//!
//! Deployment target resolution for Fob.
//!
//! Given an optional target identifier and an options bag, this crate works
//! out which hosting platform a build is running against and produces the
//! configured adapter [`Integration`] for it:
//!
//! - [`Runtime`] reads environment variables across runtime surfaces
//! - [`Detector`] guesses the platform from runtime signals
//! - [`AdapterOptions`] carries per-target options and custom factories
//! - [`Resolver`] dispatches custom → built-in → default
//! - [`select_output_mode`] derives the rendering mode for a target
//!
//! ```no_run
//! use fob_deploy::{factory_fn, AdapterOptions, Integration, NodeModulesLoader, Resolver};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> fob_deploy::Result<()> {
//! let resolver = Resolver::new(Arc::new(NodeModulesLoader::new(".")));
//! let options = AdapterOptions::new()
//!     .with("node", json!({ "mode": "middleware" }))
//!     .register("railway", factory_fn(|_| Ok(Integration::new("railway-adapter"))));
//!
//! let integration = resolver.resolve(None, &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod detection;
pub mod env;
pub mod error;
pub mod factory;
pub mod integration;
pub mod loader;
pub mod options;
pub mod output;
pub mod resolve;
pub mod target;

pub use detection::{detect_target, Detection, Detector, Signal};
pub use env::{Runtime, RuntimeBuilder, ADAPTER_ENV_VAR, OUTPUT_MODE_ENV_VAR};
pub use error::{Error, Result};
pub use factory::{
    async_factory_fn, factory_fn, typed_async_factory, typed_factory, AdapterFactory, BoxedFactory,
};
pub use integration::{hooks, Hook, HookContext, Integration};
pub use loader::{load_optional, LoadError, MemoryLoader, NodeModulesLoader, PackageFactory, PackageLoader};
pub use options::{AdapterOptions, Registry, REGISTER_KEY};
pub use output::{select_output_mode, OutputMode};
pub use resolve::{adapter, output, Outcome, Resolution, Resolver};
pub use target::BuiltinTarget;
