//! Resolving a target identifier into a configured integration.
//!
//! ```text
//! identifier ─┬─ explicit argument
//!             ├─ ASTRO_ADAPTER_MODE
//!             └─ Detector
//!        │
//!        ├─ in options.register ──→ custom factory
//!        ├─ built-in ─────────────→ load package → defaults + options → factory
//!        └─ unknown ──────────────→ warn → node with default options
//! ```
//!
//! Every call builds its own view of the registry from the options it was
//! given, invokes exactly one factory, and caches nothing.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::detection::{Detection, Detector};
use crate::env::{Runtime, ADAPTER_ENV_VAR};
use crate::error::{Error, Result};
use crate::integration::Integration;
use crate::loader::{load_optional, NodeModulesLoader, PackageLoader};
use crate::options::{json_type, AdapterOptions, REGISTER_KEY};
use crate::output::{select_output_mode, OutputMode};
use crate::target::BuiltinTarget;

/// How an identifier was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A factory from `options.register`
    Custom,
    /// A built-in target (possibly a deprecated alias)
    Builtin(BuiltinTarget),
    /// Unrecognized identifier; the default target was used instead
    Defaulted,
}

/// A resolved integration together with how it was reached.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The effective identifier, before alias or fallback handling
    pub requested: String,
    pub outcome: Outcome,
    pub integration: Integration,
}

impl Resolution {
    /// Whether the identifier was unknown and the default target was used.
    pub fn is_defaulted(&self) -> bool {
        self.outcome == Outcome::Defaulted
    }
}

/// Turns target identifiers into integrations.
#[derive(Clone)]
pub struct Resolver {
    runtime: Runtime,
    loader: Arc<dyn PackageLoader>,
    detector: Detector,
}

impl Resolver {
    /// A resolver for the current process using `loader` for built-ins.
    pub fn new(loader: Arc<dyn PackageLoader>) -> Self {
        Self {
            runtime: Runtime::current(),
            loader,
            detector: Detector::new(),
        }
    }

    /// Read environment variables and platform globals from `runtime`
    /// instead of the current process.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Snapshot consulted for `ASTRO_ADAPTER_MODE`,
    ///   `ASTRO_OUTPUT_MODE` and detection signals
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fob_deploy::{MemoryLoader, Resolver, Runtime};
    ///
    /// let runtime = Runtime::builder()
    ///     .process_env([("ASTRO_ADAPTER_MODE", "deno")])
    ///     .build();
    /// let resolver = Resolver::new(Arc::new(MemoryLoader::new())).with_runtime(runtime);
    /// assert_eq!(resolver.effective_target(None), "deno");
    /// ```
    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = runtime;
        self
    }

    /// Replace the detector, e.g. one with edge detection enabled for
    /// embedders running inside an edge runtime.
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = detector;
        self
    }

    /// Run platform detection only, ignoring the override variable.
    pub fn detect(&self) -> Detection {
        self.detector.detect(&self.runtime)
    }

    /// The identifier a call would resolve: the explicit argument, else
    /// `ASTRO_ADAPTER_MODE`, else the detected platform.
    pub fn effective_target(&self, target: Option<&str>) -> String {
        effective_target(&self.runtime, &self.detector, target)
    }

    /// Resolve `target` into a configured integration.
    ///
    /// Shorthand for [`resolve_detailed`](Self::resolve_detailed) when only
    /// the integration matters.
    pub async fn resolve(
        &self,
        target: Option<&str>,
        options: &AdapterOptions,
    ) -> Result<Integration> {
        Ok(self.resolve_detailed(target, options).await?.integration)
    }

    /// Resolve `target` and report which path was taken.
    ///
    /// Registered factories are tried first, then built-ins. Anything else
    /// logs one warning and resolves the default target with its default
    /// options.
    ///
    /// # Errors
    ///
    /// * [`Error::CustomFactory`] when a registered factory fails
    /// * [`Error::MissingDependency`] when a built-in package cannot be loaded
    /// * [`Error::InvalidOptions`] when a built-in's options are not an object
    /// * [`Error::Integration`] when a built-in factory fails
    pub async fn resolve_detailed(
        &self,
        target: Option<&str>,
        options: &AdapterOptions,
    ) -> Result<Resolution> {
        let requested = self.effective_target(target);

        if let Some(factory) = options.registry().get(&requested) {
            debug!(target_id = %requested, "using registered factory");
            let integration = factory
                .create(options.get(&requested).cloned())
                .await
                .map_err(|source| Error::custom_factory(requested.as_str(), source))?;
            return Ok(Resolution {
                requested,
                outcome: Outcome::Custom,
                integration,
            });
        }

        if let Some(builtin) = BuiltinTarget::from_id(&requested) {
            if let Some(replacement) = builtin.replacement() {
                info!(
                    "Adapter \"{}\" is deprecated; use \"{}\" instead",
                    builtin, replacement
                );
            }
            let integration = self
                .create_builtin(builtin, &requested, options.get(&requested))
                .await?;
            return Ok(Resolution {
                requested,
                outcome: Outcome::Builtin(builtin),
                integration,
            });
        }

        warn!(
            "Unknown adapter \"{}\", falling back to \"{}\". \
             Register custom adapters through the `{}` option.",
            requested,
            BuiltinTarget::DEFAULT,
            REGISTER_KEY
        );
        let default = BuiltinTarget::DEFAULT;
        let integration = self.create_builtin(default, default.id(), None).await?;
        Ok(Resolution {
            requested,
            outcome: Outcome::Defaulted,
            integration,
        })
    }

    async fn create_builtin(
        &self,
        builtin: BuiltinTarget,
        id: &str,
        options: Option<&Value>,
    ) -> Result<Integration> {
        let mut merged = builtin.default_options();
        match options {
            None | Some(Value::Null) => {}
            Some(Value::Object(overrides)) => {
                for (key, value) in overrides {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Some(other) => {
                return Err(Error::InvalidOptions {
                    target: id.to_string(),
                    found: json_type(other),
                });
            }
        }

        let package = builtin.package();
        let factory = load_optional(self.loader.as_ref(), package).await?;
        debug!(target_id = id, package, "invoking built-in adapter");
        factory
            .create(Some(Value::Object(merged)))
            .await
            .map_err(|source| Error::Integration {
                target: id.to_string(),
                package: package.to_string(),
                source,
            })
    }

    /// Output mode for a target; see [`select_output_mode`].
    pub fn select_mode(&self, target: Option<&str>, mode: Option<OutputMode>) -> OutputMode {
        let target = self.effective_target(target);
        select_output_mode(&target, mode, &self.runtime)
    }
}

fn effective_target(runtime: &Runtime, detector: &Detector, target: Option<&str>) -> String {
    if let Some(target) = target {
        return target.to_string();
    }
    if let Some(target) = runtime.get_env_non_empty(ADAPTER_ENV_VAR) {
        debug!(target_id = %target, "target taken from {}", ADAPTER_ENV_VAR);
        return target;
    }
    detector.detect(runtime).target.id().to_string()
}

/// Resolve an adapter for the current process.
///
/// Built-in adapter packages are looked up in `node_modules` from the
/// current directory upward.
///
/// # Errors
///
/// Everything [`Resolver::resolve_detailed`] reports, plus
/// [`Error::WorkingDirectory`] when the current directory cannot be read.
///
/// ```no_run
/// # async fn example() -> fob_deploy::Result<()> {
/// use fob_deploy::AdapterOptions;
///
/// let integration = fob_deploy::adapter(None, &AdapterOptions::new()).await?;
/// println!("deploying with {}", integration.name());
/// # Ok(())
/// # }
/// ```
pub async fn adapter(target: Option<&str>, options: &AdapterOptions) -> Result<Integration> {
    let loader = NodeModulesLoader::from_current_dir().map_err(Error::WorkingDirectory)?;
    Resolver::new(Arc::new(loader)).resolve(target, options).await
}

/// Output mode for the current process.
///
/// No packages are loaded, so this never fails.
///
/// ```no_run
/// use fob_deploy::OutputMode;
///
/// let mode = fob_deploy::output(Some("vercel-static"), Some(OutputMode::Server));
/// assert_eq!(mode, OutputMode::Static);
/// ```
pub fn output(target: Option<&str>, mode: Option<OutputMode>) -> OutputMode {
    let runtime = Runtime::current();
    let target = effective_target(&runtime, &Detector::new(), target);
    select_output_mode(&target, mode, &runtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory_fn;
    use crate::loader::MemoryLoader;
    use serde_json::json;

    fn echo(package: &'static str) -> crate::BoxedFactory {
        factory_fn(move |options| {
            let integration = Integration::new(package).hook("options", move |ctx| {
                ctx.update_config(json!({ "options": options.clone() }));
                Ok(())
            });
            Ok(integration)
        })
    }

    fn resolver() -> Resolver {
        let loader = MemoryLoader::new()
            .with("@astrojs/node", echo("@astrojs/node"))
            .with("@astrojs/vercel", echo("@astrojs/vercel"))
            .with("@deno/astro-adapter", echo("@deno/astro-adapter"));
        Resolver::new(Arc::new(loader)).with_runtime(
            Runtime::builder()
                .process_env(Vec::<(String, String)>::new())
                .build(),
        )
    }

    fn options_seen(integration: &Integration) -> Value {
        let mut ctx = crate::HookContext::default();
        integration.run_hook("options", &mut ctx).unwrap();
        ctx.config()["options"].clone()
    }

    #[test]
    fn effective_target_prefers_explicit_argument() {
        let resolver = resolver().with_runtime(
            Runtime::builder()
                .process_env([(ADAPTER_ENV_VAR, "vercel"), ("NETLIFY", "true")])
                .build(),
        );
        assert_eq!(resolver.effective_target(Some("deno")), "deno");
        assert_eq!(resolver.effective_target(None), "vercel");
    }

    #[test]
    fn effective_target_falls_back_to_detection() {
        let resolver = resolver().with_runtime(
            Runtime::builder()
                .process_env([(ADAPTER_ENV_VAR, ""), ("NETLIFY", "true")])
                .build(),
        );
        assert_eq!(resolver.effective_target(None), "netlify");
    }

    #[tokio::test]
    async fn node_gets_standalone_default() {
        let integration = resolver()
            .resolve(Some("node"), &AdapterOptions::new())
            .await
            .unwrap();
        assert_eq!(integration.name(), "@astrojs/node");
        assert_eq!(options_seen(&integration), json!({ "mode": "standalone" }));
    }

    #[tokio::test]
    async fn caller_options_override_defaults() {
        let options = AdapterOptions::new()
            .with("deno", json!({ "port": 8080, "hostname": "0.0.0.0" }))
            .with("node", json!({ "mode": "ignored" }));
        let integration = resolver().resolve(Some("deno"), &options).await.unwrap();
        assert_eq!(
            options_seen(&integration),
            json!({ "port": 8080, "hostname": "0.0.0.0" })
        );
    }

    #[tokio::test]
    async fn alias_uses_its_own_options_key() {
        let options = AdapterOptions::new()
            .with("vercel-static", json!({ "imageService": true }))
            .with("vercel", json!({ "imageService": false }));
        let resolution = resolver()
            .resolve_detailed(Some("vercel-static"), &options)
            .await
            .unwrap();
        assert_eq!(resolution.outcome, Outcome::Builtin(BuiltinTarget::VercelStatic));
        assert_eq!(resolution.integration.name(), "@astrojs/vercel");
        assert_eq!(
            options_seen(&resolution.integration),
            json!({ "imageService": true })
        );
    }

    #[tokio::test]
    async fn non_object_builtin_options_are_rejected() {
        let options = AdapterOptions::new().with("vercel", json!("fast"));
        let err = resolver().resolve(Some("vercel"), &options).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOptions { ref target, found: "a string" } if target == "vercel"
        ));
    }

    #[tokio::test]
    async fn missing_package_is_reported() {
        let err = resolver()
            .resolve(Some("cloudflare"), &AdapterOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingDependency { ref package, .. } if package == "@astrojs/cloudflare"
        ));
    }

    #[tokio::test]
    async fn builtin_factory_failure_names_target_and_package() {
        let loader = MemoryLoader::new().with(
            "@astrojs/netlify",
            factory_fn(|_| anyhow::bail!("edge functions unsupported")),
        );
        let resolver = Resolver::new(Arc::new(loader));
        let err = resolver
            .resolve(Some("netlify-edge"), &AdapterOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.target(), Some("netlify-edge"));
        assert!(err.to_string().contains("@astrojs/netlify"));
        assert!(err.to_string().contains("edge functions unsupported"));
    }

    #[tokio::test]
    async fn unknown_target_defaults_to_node_defaults() {
        let options = AdapterOptions::new().with("railway", json!({ "region": "us-west" }));
        let resolution = resolver()
            .resolve_detailed(Some("railway"), &options)
            .await
            .unwrap();
        assert!(resolution.is_defaulted());
        assert_eq!(resolution.requested, "railway");
        assert_eq!(resolution.integration.name(), "@astrojs/node");
        assert_eq!(
            options_seen(&resolution.integration),
            json!({ "mode": "standalone" })
        );
    }

    #[test]
    fn edge_detector_changes_detected_target() {
        let runtime = Runtime::builder()
            .process_env(Vec::<(String, String)>::new())
            .edge_runtime()
            .build();
        let plain = resolver().with_runtime(runtime);
        let edge = plain.clone().with_detector(Detector::new().with_edge_detection(true));

        assert_eq!(plain.detect().target, BuiltinTarget::Node);
        assert_eq!(edge.detect().target, BuiltinTarget::VercelEdge);
        assert_eq!(edge.effective_target(None), "vercel-edge");
    }

    #[test]
    fn select_mode_uses_effective_target() {
        let resolver = resolver().with_runtime(
            Runtime::builder()
                .process_env([(ADAPTER_ENV_VAR, "netlify-static")])
                .build(),
        );
        assert_eq!(
            resolver.select_mode(None, Some(OutputMode::Server)),
            OutputMode::Static
        );
        assert_eq!(
            resolver.select_mode(Some("netlify"), Some(OutputMode::Server)),
            OutputMode::Server
        );
    }
}
