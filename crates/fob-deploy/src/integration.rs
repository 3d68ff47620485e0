//! The integration object handed to the host build tool.
//!
//! An [`Integration`] is opaque to the resolver: a name plus a table of
//! lifecycle hooks. Hooks receive a [`HookContext`] wrapping the host's
//! config document and may patch it through [`HookContext::update_config`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// Well-known hook names.
pub mod hooks {
    pub const CONFIG_SETUP: &str = "astro:config:setup";
    pub const CONFIG_DONE: &str = "astro:config:done";
    pub const BUILD_DONE: &str = "astro:build:done";
}

/// A lifecycle hook.
pub type Hook = Arc<dyn Fn(&mut HookContext) -> anyhow::Result<()> + Send + Sync>;

/// State passed to a hook.
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    config: Value,
}

impl HookContext {
    /// Wrap the host's current config document.
    pub fn new(config: Value) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    /// The config after every hook has run.
    pub fn into_config(self) -> Value {
        self.config
    }

    /// Deep-merge `patch` into the config. Objects merge key by key; any
    /// other value replaces what was there.
    pub fn update_config(&mut self, patch: Value) {
        merge_values(&mut self.config, &patch);
    }
}

/// A configured adapter integration.
#[derive(Clone, Default)]
pub struct Integration {
    name: String,
    hooks: IndexMap<String, Hook>,
}

impl Integration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: IndexMap::new(),
        }
    }

    /// Add a hook, replacing any previous hook of the same name.
    pub fn hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut HookContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the registered hooks, in registration order.
    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// Run a hook if present. Returns `Ok(false)` when there is no such hook.
    pub fn run_hook(&self, name: &str, ctx: &mut HookContext) -> anyhow::Result<bool> {
        match self.hooks.get(name) {
            Some(hook) => {
                hook(ctx)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integration")
            .field("name", &self.name)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
