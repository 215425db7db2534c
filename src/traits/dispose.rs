//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (e.g. flushing caches,
/// closing connections). Register the instance from its constructor with
/// [`ResolverContext::register_disposer`](crate::ResolverContext::register_disposer);
/// hooks run in LIFO order when the owning container is disposed.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Dispose, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Cache {
///     flushed: AtomicBool,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Cache>().to_single_method(|ctx| {
///     let cache = Arc::new(Cache { flushed: AtomicBool::new(false) });
///     ctx.register_disposer(cache.clone());
///     Ok(cache)
/// }).unwrap();
///
/// let container = builder.build();
/// let cache = container.resolve::<Cache>().unwrap();
/// container.dispose();
/// assert!(cache.flushed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
