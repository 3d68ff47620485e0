//! The options bag passed to the resolver.
//!
//! Options are keyed by target identifier. Each value is opaque JSON and is
//! only looked at when its identifier is the one being resolved. The reserved
//! `register` key carries the custom [`Registry`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::factory::{AdapterFactory, BoxedFactory};
use crate::loader::{PackageFactory, PackageLoader};

/// Reserved options key holding custom factories.
pub const REGISTER_KEY: &str = "register";

/// Caller-supplied factories, consulted before built-ins.
#[derive(Clone, Default)]
pub struct Registry {
    factories: IndexMap<String, BoxedFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one for `id`.
    pub fn insert(&mut self, id: impl Into<String>, factory: BoxedFactory) -> Option<BoxedFactory> {
        self.factories.insert(id.into(), factory)
    }

    /// Factory registered for `id`; identifiers are matched exactly.
    pub fn get(&self, id: &str) -> Option<&BoxedFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

/// Options for every target the caller cares about, plus custom factories.
///
/// ```
/// use fob_deploy::{factory_fn, AdapterOptions, Integration};
/// use serde_json::json;
///
/// let options = AdapterOptions::new()
///     .with("vercel", json!({ "webAnalytics": { "enabled": true } }))
///     .with("railway", json!({ "region": "us-west" }))
///     .register("railway", factory_fn(|_| Ok(Integration::new("railway-adapter"))));
///
/// assert!(options.registry().contains("railway"));
/// assert_eq!(options.get("vercel").unwrap()["webAnalytics"]["enabled"], true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    targets: IndexMap<String, Value>,
    register: Registry,
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set options for `id`.
    pub fn with(mut self, id: impl Into<String>, options: Value) -> Self {
        self.set(id, options);
        self
    }

    /// Set options for `id` from any serializable value.
    pub fn with_serialized<T: Serialize>(
        mut self,
        id: impl Into<String>,
        options: &T,
    ) -> serde_json::Result<Self> {
        self.set(id, serde_json::to_value(options)?);
        Ok(self)
    }

    /// In-place form of [`with`](Self::with).
    pub fn set(&mut self, id: impl Into<String>, options: Value) {
        self.targets.insert(id.into(), options);
    }

    /// Register a custom factory under `id`.
    pub fn register(mut self, id: impl Into<String>, factory: BoxedFactory) -> Self {
        self.register.insert(id, factory);
        self
    }

    /// Register any [`AdapterFactory`] implementation under `id`.
    pub fn register_factory<F>(self, id: impl Into<String>, factory: F) -> Self
    where
        F: AdapterFactory + 'static,
    {
        self.register(id, Arc::new(factory))
    }

    /// Options stored under `id`, if any.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.targets.get(id)
    }

    /// Factories registered through [`register`](Self::register), consulted
    /// before the built-ins.
    pub fn registry(&self) -> &Registry {
        &self.register
    }

    /// Build from a JSON document such as a parsed config table.
    ///
    /// Every top-level key except `register` is a target's options. The
    /// `register` table maps custom identifiers to the package that provides
    /// their factory; those packages load through `loader` on use.
    pub fn from_value(value: Value, loader: Arc<dyn PackageLoader>) -> crate::Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(crate::Error::InvalidOptions {
                    target: "options".to_string(),
                    found: json_type(&other),
                })
            }
        };

        let mut options = Self::new();
        if let Some(register) = map.remove(REGISTER_KEY) {
            let entries = match register {
                Value::Object(entries) => entries,
                other => {
                    return Err(crate::Error::InvalidOptions {
                        target: REGISTER_KEY.to_string(),
                        found: json_type(&other),
                    })
                }
            };
            for (id, package) in entries {
                let package = match package {
                    Value::String(package) => package,
                    other => {
                        return Err(crate::Error::InvalidOptions {
                            target: format!("{}.{}", REGISTER_KEY, id),
                            found: json_type(&other),
                        })
                    }
                };
                let factory = PackageFactory::new(package, loader.clone());
                options = options.register_factory(id, factory);
            }
        }

        for (id, target_options) in map {
            options.set(id, target_options);
        }
        Ok(options)
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use crate::{factory_fn, Integration};
    use serde_json::json;

    #[test]
    fn absent_target_options_are_none() {
        let options = AdapterOptions::new().with("vercel", json!({}));
        assert!(options.get("vercel").is_some());
        assert!(options.get("netlify").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = Registry::new();
        assert!(registry
            .insert("a", factory_fn(|_| Ok(Integration::new("one"))))
            .is_none());
        assert!(registry
            .insert("a", factory_fn(|_| Ok(Integration::new("two"))))
            .is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn from_value_splits_register_table() {
        let loader = Arc::new(MemoryLoader::new());
        let options = AdapterOptions::from_value(
            json!({
                "node": { "mode": "middleware" },
                "railway": { "region": "us-west" },
                "register": { "railway": "@railway/astro" }
            }),
            loader,
        )
        .unwrap();

        assert_eq!(options.registry().ids().collect::<Vec<_>>(), vec!["railway"]);
        assert_eq!(options.get("node").unwrap()["mode"], "middleware");
        assert!(options.get(REGISTER_KEY).is_none());
    }

    #[test]
    fn from_value_rejects_non_string_packages() {
        let loader = Arc::new(MemoryLoader::new());
        let err = AdapterOptions::from_value(json!({ "register": { "railway": 1 } }), loader)
            .unwrap_err();
        assert_eq!(err.target(), Some("register.railway"));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let loader = Arc::new(MemoryLoader::new());
        assert!(AdapterOptions::from_value(json!(["vercel"]), loader).is_err());
    }

    #[test]
    fn with_serialized_accepts_structs() {
        #[derive(Serialize)]
        struct NodeOptions {
            mode: &'static str,
        }
        let options = AdapterOptions::new()
            .with_serialized("node", &NodeOptions { mode: "middleware" })
            .unwrap();
        assert_eq!(options.get("node"), Some(&json!({ "mode": "middleware" })));
    }
}
