//! Loading optional adapter packages.
//!
//! Every built-in target is backed by an adapter package that is an optional
//! peer dependency: most projects install exactly one. A [`PackageLoader`]
//! turns a package name into the factory it exports, and [`load_optional`]
//! turns "not installed" into an actionable [`Error::MissingDependency`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::factory::{AdapterFactory, BoxedFactory};
use crate::integration::{hooks, Integration};

/// Why a package could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("package not found: {0}")]
    NotFound(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid package manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves adapter packages to their factories.
#[async_trait]
pub trait PackageLoader: Send + Sync {
    async fn load(&self, package: &str) -> std::result::Result<BoxedFactory, LoadError>;
}

/// Load an optional package, replacing any failure with an install hint.
///
/// The underlying [`LoadError`] is only logged. No retries.
pub async fn load_optional(loader: &dyn PackageLoader, package: &str) -> Result<BoxedFactory> {
    match loader.load(package).await {
        Ok(factory) => Ok(factory),
        Err(err) => {
            debug!(package, error = %err, "optional package failed to load");
            Err(Error::missing_dependency(package))
        }
    }
}

/// Packages linked into the host program.
///
/// ```
/// use fob_deploy::{factory_fn, Integration, MemoryLoader};
///
/// let loader = MemoryLoader::new()
///     .with("@astrojs/node", factory_fn(|_| Ok(Integration::new("@astrojs/node"))));
/// assert!(loader.contains("@astrojs/node"));
/// ```
#[derive(Clone, Default)]
pub struct MemoryLoader {
    packages: HashMap<String, BoxedFactory>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: impl Into<String>, factory: BoxedFactory) -> Self {
        self.insert(package, factory);
        self
    }

    pub fn insert(&mut self, package: impl Into<String>, factory: BoxedFactory) {
        self.packages.insert(package.into(), factory);
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }
}

#[async_trait]
impl PackageLoader for MemoryLoader {
    async fn load(&self, package: &str) -> std::result::Result<BoxedFactory, LoadError> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(package.to_string()))
    }
}

/// Node-style package resolution from a project directory.
///
/// Looks for `node_modules/<package>/package.json` in `root` and then in
/// each ancestor directory, the same walk Node's resolver does.
#[derive(Debug, Clone)]
pub struct NodeModulesLoader {
    root: PathBuf,
}

impl NodeModulesLoader {
    /// Start lookups at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Rooted at the current working directory.
    ///
    /// # Errors
    ///
    /// Fails when the working directory is missing or unreadable.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the installed package directory, if any.
    pub async fn locate(&self, package: &str) -> Option<PathBuf> {
        for dir in self.root.ancestors() {
            let candidate = dir.join("node_modules").join(package);
            if tokio::fs::try_exists(candidate.join("package.json"))
                .await
                .unwrap_or(false)
            {
                return Some(candidate);
            }
        }
        None
    }
}

#[async_trait]
impl PackageLoader for NodeModulesLoader {
    async fn load(&self, package: &str) -> std::result::Result<BoxedFactory, LoadError> {
        let dir = self
            .locate(package)
            .await
            .ok_or_else(|| LoadError::NotFound(package.to_string()))?;
        let manifest = PackageManifest::read(&dir).await?;
        debug!(
            package,
            version = manifest.version.as_deref().unwrap_or("unknown"),
            "loaded adapter package"
        );
        Ok(Arc::new(InstalledAdapter { dir, manifest }))
    }
}

/// The subset of `package.json` the loader reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub exports: Option<Value>,
}

impl PackageManifest {
    async fn read(dir: &Path) -> std::result::Result<Self, LoadError> {
        let path = dir.join("package.json");
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Manifest { path, source })
    }

    /// Module entry point: `exports["."]` (string or `import`/`default`
    /// condition), then `exports` as a string, then `main`, then `index.js`.
    pub fn entrypoint(&self) -> String {
        let from_exports = match &self.exports {
            Some(Value::String(entry)) => Some(entry.clone()),
            Some(Value::Object(map)) => match map.get(".") {
                Some(Value::String(entry)) => Some(entry.clone()),
                Some(Value::Object(conditions)) => ["import", "default"]
                    .iter()
                    .find_map(|c| conditions.get(*c).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            },
            _ => None,
        };
        from_exports
            .or_else(|| self.main.clone())
            .unwrap_or_else(|| "index.js".to_string())
    }
}

/// Factory exported by a package installed on disk.
///
/// The integration it builds registers the adapter with the host config
/// during `astro:config:setup`; the host loads the entrypoint itself.
struct InstalledAdapter {
    dir: PathBuf,
    manifest: PackageManifest,
}

#[async_trait]
impl AdapterFactory for InstalledAdapter {
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration> {
        let adapter = json!({
            "name": self.manifest.name,
            "version": self.manifest.version,
            "entrypoint": self.dir.join(self.manifest.entrypoint()),
            "options": options.unwrap_or_else(|| json!({})),
        });
        let integration = Integration::new(self.manifest.name.clone()).hook(
            hooks::CONFIG_SETUP,
            move |ctx| {
                ctx.update_config(json!({ "adapter": adapter.clone() }));
                Ok(())
            },
        );
        Ok(integration)
    }
}

/// Custom identifier backed by an optional package rather than a closure.
///
/// Used for `register` entries that come from configuration files.
pub struct PackageFactory {
    package: String,
    loader: Arc<dyn PackageLoader>,
}

impl PackageFactory {
    pub fn new(package: impl Into<String>, loader: Arc<dyn PackageLoader>) -> Self {
        Self {
            package: package.into(),
            loader,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

#[async_trait]
impl AdapterFactory for PackageFactory {
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration> {
        let factory = load_optional(self.loader.as_ref(), &self.package).await?;
        factory.create(options).await
    }
}
