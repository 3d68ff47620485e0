//! Factories turn per-target options into an [`Integration`].
//!
//! A factory may complete synchronously or asynchronously; the resolver
//! always awaits it. The closures wrapped by [`factory_fn`] and friends are
//! owned by the caller and only ever invoked, never retained across calls.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::integration::Integration;

/// Builds an [`Integration`] from the options stored under its identifier.
///
/// `options` is `None` when the caller supplied no entry for the identifier.
/// Registered factories therefore see `None` for an absent entry, not an
/// empty object; only built-in factories always receive an object (their
/// defaults overlaid with the caller's options). The value is opaque to the
/// resolver; factories validate it themselves.
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration>;
}

/// A shared factory trait object.
pub type BoxedFactory = Arc<dyn AdapterFactory>;

/// Factory backed by a synchronous closure. See [`factory_fn`].
pub struct FnFactory<F> {
    f: F,
}

#[async_trait]
impl<F> AdapterFactory for FnFactory<F>
where
    F: Fn(Option<Value>) -> anyhow::Result<Integration> + Send + Sync,
{
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration> {
        (self.f)(options)
    }
}

/// Factory backed by a closure returning a future. See [`async_factory_fn`].
pub struct AsyncFnFactory<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> AdapterFactory for AsyncFnFactory<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Integration>> + Send,
{
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration> {
        (self.f)(options).await
    }
}

/// Factory that deserializes its options into `T` first.
pub struct TypedFactory<T, F> {
    f: F,
    _options: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T, F, Fut> AdapterFactory for TypedFactory<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(Option<T>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Integration>> + Send,
{
    async fn create(&self, options: Option<Value>) -> anyhow::Result<Integration> {
        let typed = match options {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<T>(value)?),
        };
        (self.f)(typed).await
    }
}

/// Wrap a synchronous closure as a factory.
///
/// ```
/// use fob_deploy::{factory_fn, Integration};
///
/// let factory = factory_fn(|_options| Ok(Integration::new("my-adapter")));
/// ```
pub fn factory_fn<F>(f: F) -> BoxedFactory
where
    F: Fn(Option<Value>) -> anyhow::Result<Integration> + Send + Sync + 'static,
{
    Arc::new(FnFactory { f })
}

/// Wrap an asynchronous closure as a factory.
pub fn async_factory_fn<F, Fut>(f: F) -> BoxedFactory
where
    F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Integration>> + Send + 'static,
{
    Arc::new(AsyncFnFactory { f })
}

/// Wrap a synchronous closure taking typed options.
///
/// Options that fail to deserialize into `T` are reported as a factory
/// failure, like any other error the closure returns.
///
/// ```
/// use fob_deploy::{typed_factory, Integration};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct RailwayOptions {
///     region: String,
/// }
///
/// let factory = typed_factory(|options: Option<RailwayOptions>| {
///     let options = options.ok_or_else(|| anyhow::anyhow!("region is required"))?;
///     Ok(Integration::new(format!("railway-{}", options.region)))
/// });
/// ```
pub fn typed_factory<T, F>(f: F) -> BoxedFactory
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(Option<T>) -> anyhow::Result<Integration> + Send + Sync + 'static,
{
    typed_async_factory(move |options| std::future::ready(f(options)))
}

/// Wrap an asynchronous closure taking typed options.
pub fn typed_async_factory<T, F, Fut>(f: F) -> BoxedFactory
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(Option<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Integration>> + Send + 'static,
{
    Arc::new(TypedFactory {
        f,
        _options: PhantomData,
    })
}
