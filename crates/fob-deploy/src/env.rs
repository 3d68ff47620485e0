//! Cross-runtime environment access.
//!
//! JavaScript hosts expose environment variables through different global
//! shapes: Deno through `Deno.env`, Netlify's edge runtime through
//! `Netlify.env`, everything else through `process.env`. A [`Runtime`]
//! snapshots whichever of those surfaces the host actually provides, plus the
//! identity signals (`Deno`, `Netlify`, `EdgeRuntime` globals and
//! `navigator.userAgent`) the detector looks at.
//!
//! A plain native process only has the process environment, which is what
//! [`Runtime::current`] describes. Embedders of a JS runtime, and tests, use
//! [`Runtime::builder`] to describe the rest.

use std::collections::HashMap;

use tracing::trace;

/// Environment variable that overrides the auto-detected target identifier.
pub const ADAPTER_ENV_VAR: &str = "ASTRO_ADAPTER_MODE";

/// Environment variable that overrides the default output mode.
pub const OUTPUT_MODE_ENV_VAR: &str = "ASTRO_OUTPUT_MODE";

/// The process environment surface.
#[derive(Debug, Clone, Default)]
pub enum ProcessEnv {
    /// Read through `std::env` at lookup time
    #[default]
    System,
    /// A fixed snapshot, independent of the real process
    Fixed(HashMap<String, String>),
    /// No `process` global at all
    Absent,
}

impl ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            Self::System => std::env::var(name).ok(),
            Self::Fixed(vars) => vars.get(name).cloned(),
            Self::Absent => None,
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// One place a runtime may keep environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSurface {
    Deno,
    Netlify,
    Process,
}

impl EnvSurface {
    /// Probe order used by [`Runtime::get_env`].
    pub const ORDER: [EnvSurface; 3] = [Self::Deno, Self::Netlify, Self::Process];
}

/// Snapshot of the host runtime's capability surfaces.
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    deno_global: bool,
    deno_env: Option<HashMap<String, String>>,
    netlify_global: bool,
    netlify_env: Option<HashMap<String, String>>,
    edge_runtime: bool,
    user_agent: Option<String>,
    process: ProcessEnv,
}

impl Runtime {
    /// A native process: real process environment, no JS runtime globals.
    pub fn current() -> Self {
        Self::default()
    }

    /// Describe a runtime surface by surface.
    ///
    /// Anything not set on the builder is absent, except the process
    /// environment, which stays the real one until
    /// [`process_env`](RuntimeBuilder::process_env) or
    /// [`without_process`](RuntimeBuilder::without_process) replaces it.
    ///
    /// # Examples
    ///
    /// ```
    /// use fob_deploy::Runtime;
    ///
    /// let runtime = Runtime::builder()
    ///     .deno_env([("ASTRO_ADAPTER_MODE", "deno")])
    ///     .without_process()
    ///     .build();
    /// assert!(runtime.has_deno_global());
    /// assert_eq!(runtime.get_env("ASTRO_ADAPTER_MODE").as_deref(), Some("deno"));
    /// ```
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Whether the given surface exists in this runtime.
    pub fn has_surface(&self, surface: EnvSurface) -> bool {
        match surface {
            EnvSurface::Deno => self.deno_env.is_some(),
            EnvSurface::Netlify => self.netlify_env.is_some(),
            EnvSurface::Process => self.process.is_available(),
        }
    }

    fn lookup(&self, surface: EnvSurface, name: &str) -> Option<String> {
        match surface {
            EnvSurface::Deno => self.deno_env.as_ref()?.get(name).cloned(),
            EnvSurface::Netlify => self.netlify_env.as_ref()?.get(name).cloned(),
            EnvSurface::Process => self.process.get(name),
        }
    }

    /// Read an environment variable.
    ///
    /// Surfaces are probed Deno, then Netlify, then the process environment;
    /// the first defined value wins. A missing surface counts as "not found".
    pub fn get_env(&self, name: &str) -> Option<String> {
        EnvSurface::ORDER
            .into_iter()
            .filter(|surface| self.has_surface(*surface))
            .find_map(|surface| {
                let value = self.lookup(surface, name)?;
                trace!(?surface, var = name, "environment variable found");
                Some(value)
            })
    }

    /// Like [`get_env`](Self::get_env), treating an empty value as unset.
    pub fn get_env_non_empty(&self, name: &str) -> Option<String> {
        self.get_env(name).filter(|value| !value.is_empty())
    }

    /// `"Deno" in globalThis`
    pub fn has_deno_global(&self) -> bool {
        self.deno_global
    }

    /// `"Netlify" in globalThis`
    pub fn has_netlify_global(&self) -> bool {
        self.netlify_global
    }

    /// `typeof EdgeRuntime === "string"`
    pub fn has_edge_runtime(&self) -> bool {
        self.edge_runtime
    }

    /// `navigator.userAgent`, when the runtime has a navigator.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Builder for a [`Runtime`] snapshot.
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    runtime: Runtime,
}

impl RuntimeBuilder {
    /// Mark the `Deno` global present with the given `Deno.env` contents.
    pub fn deno_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.runtime.deno_global = true;
        self.runtime.deno_env = Some(collect(vars));
        self
    }

    /// Mark the `Deno` global present without an env surface.
    pub fn deno_global(mut self) -> Self {
        self.runtime.deno_global = true;
        self
    }

    /// Mark the `Netlify` global present with the given `Netlify.env` contents.
    pub fn netlify_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.runtime.netlify_global = true;
        self.runtime.netlify_env = Some(collect(vars));
        self
    }

    /// Mark the `Netlify` global present without an env surface.
    ///
    /// With edge detection on, this alone selects `netlify-edge`.
    pub fn netlify_global(mut self) -> Self {
        self.runtime.netlify_global = true;
        self
    }

    /// Mark the `EdgeRuntime` global present, as Vercel's edge runtime does.
    pub fn edge_runtime(mut self) -> Self {
        self.runtime.edge_runtime = true;
        self
    }

    /// Set `navigator.userAgent`.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Exact value; `Cloudflare-Workers` is what the
    ///   detector matches
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.runtime.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the process environment with a fixed snapshot.
    pub fn process_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.runtime.process = ProcessEnv::Fixed(collect(vars));
        self
    }

    /// Drop the process environment, as in runtimes without `process`.
    pub fn without_process(mut self) -> Self {
        self.runtime.process = ProcessEnv::Absent;
        self
    }

    pub fn build(self) -> Runtime {
        self.runtime
    }
}

fn collect<I, K, V>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    vars.into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
