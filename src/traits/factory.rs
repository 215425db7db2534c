//! Factory trait used by custom-factory and platform object bindings.

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::FactoryResult;

/// Creates values of contract `C` on request.
///
/// This is the single-method contract through which externally supplied
/// object factories (engine objects, resource loaders and the like) plug
/// into the container. The container only invokes `create`; how the value
/// is produced is up to the implementation.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Factory, FactoryResult, Injectable, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Connection { url: String }
///
/// struct ConnectionFactory { url: Arc<String> }
///
/// impl Injectable for ConnectionFactory {
///     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
///         Ok(Self { url: ctx.resolve::<String>()? })
///     }
/// }
///
/// impl Factory<Connection> for ConnectionFactory {
///     fn create(&self, _ctx: &ResolverContext<'_>) -> FactoryResult<Arc<Connection>> {
///         Ok(Arc::new(Connection { url: self.url.to_string() }))
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<String>().to_instance(Arc::new("postgres://db".to_string())).unwrap();
/// builder.bind::<Connection>().to_factory::<ConnectionFactory>().unwrap();
///
/// let container = builder.build();
/// assert_eq!(container.resolve::<Connection>().unwrap().url, "postgres://db");
/// ```
pub trait Factory<C: ?Sized>: Send + Sync + 'static {
    /// Produces one value, or fails.
    fn create(&self, ctx: &ResolverContext<'_>) -> FactoryResult<Arc<C>>;
}
