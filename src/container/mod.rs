//! The container: bindings, singleton cache and the resolution algorithm.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::config::ContainerOptions;
use crate::context::InjectContext;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::{CycleGuard, DisposeBag};
use crate::key::{ContractKey, TypeInfo};
use crate::observer::Observers;
use crate::provider::{AnyArc, SingletonCache};
use crate::registry::{Binding, BindingRegistry};
use crate::traits::{Injectable, ResolverCore};

mod resolver;

pub use resolver::ResolverContext;

/// Dependency injection container.
///
/// Built once from a [`ContainerBuilder`](crate::ContainerBuilder) and
/// immutable afterwards. Cloning is cheap and every clone shares the same
/// bindings and singleton cache.
///
/// A container may have a parent, which answers every request the container
/// has no local binding for. Facade bindings create such child containers
/// on first use; a child never keeps its parent alive.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Injectable, FactoryResult, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
///
/// struct Server { config: Arc<Config> }
///
/// impl Injectable for Server {
///     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
///         Ok(Self { config: ctx.resolve()? })
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Config>().to_instance(Arc::new(Config { port: 8080 })).unwrap();
/// builder.bind::<Server>().to_single::<Server>().unwrap();
///
/// let container = builder.build();
/// let a = container.resolve::<Server>().unwrap();
/// let b = container.resolve::<Server>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.config.port, 8080);
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: BindingRegistry,
    singletons: SingletonCache,
    parent: Option<Weak<ContainerInner>>,
    children: Mutex<Vec<Weak<ContainerInner>>>,
    disposers: Mutex<DisposeBag>,
    observers: Observers,
    options: ContainerOptions,
}

impl Container {
    pub(crate) fn new(
        registry: BindingRegistry,
        parent: Option<&Container>,
        observers: Observers,
        options: ContainerOptions,
    ) -> Self {
        let inner = Arc::new(ContainerInner {
            registry,
            singletons: SingletonCache::new(),
            parent: parent.map(|p| Arc::downgrade(&p.inner)),
            children: Mutex::new(Vec::new()),
            disposers: Mutex::new(DisposeBag::default()),
            observers,
            options,
        });
        if let Some(parent) = parent {
            parent.inner.children.lock().push(Arc::downgrade(&inner));
        }
        Self { inner }
    }

    /// The enclosing container, if this one was created by a facade and the
    /// parent is still alive.
    pub fn parent(&self) -> Option<Container> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Container { inner })
    }

    /// The options this container was built with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// Descriptors of the local bindings, in declaration order.
    pub fn bindings(&self) -> Vec<BindingDescriptor> {
        self.inner.registry.iter().map(Binding::descriptor).collect()
    }

    /// Returns true if this container or one of its parents binds `key`.
    ///
    /// Conditions are not evaluated.
    pub fn has_binding(&self, key: &ContractKey) -> bool {
        self.inner.registry.contains(key)
            || self.parent().is_some_and(|parent| parent.has_binding(key))
    }

    /// Number of singletons built and cached in this container.
    pub fn singleton_count(&self) -> usize {
        self.inner.singletons.len()
    }

    /// Builds an unbound `T`, injecting its dependencies from this container.
    pub fn instantiate<T: Injectable>(&self) -> DiResult<T> {
        let guard = CycleGuard::new(self.inner.options.max_depth);
        let root = InjectContext::root(ContractKey::of::<T>(), false);
        let ctx = ResolverContext::new(self, &root, &guard, TypeInfo::of::<T>());
        T::construct(&ctx).map_err(|e| DiError::from_factory(e, root.key(), None))
    }

    /// Tears the container down.
    ///
    /// Facade children are disposed first, depth first and most recent
    /// first. Then this container's disposal hooks run in LIFO order and its
    /// singleton cache is cleared. Calling it again only runs hooks queued
    /// since the last call. Later resolves rebuild singletons lazily.
    pub fn dispose(&self) {
        let children: Vec<Container> = self
            .inner
            .children
            .lock()
            .iter()
            .rev()
            .filter_map(Weak::upgrade)
            .map(|inner| Container { inner })
            .collect();
        for child in &children {
            child.dispose();
        }

        let hooks = self.inner.disposers.lock().take_reversed();
        let count = hooks.len();
        for hook in hooks {
            hook();
        }
        self.inner.singletons.clear();

        tracing::debug!(
            container = self.inner.options.display_name(),
            children = children.len(),
            hooks = count,
            "container disposed"
        );
    }

    pub(crate) fn singletons(&self) -> &SingletonCache {
        &self.inner.singletons
    }

    pub(crate) fn observers(&self) -> &Observers {
        &self.inner.observers
    }

    pub(crate) fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        self.inner.disposers.lock().push(hook);
    }

    /// Resolves the request described by `context`.
    ///
    /// Falls back to the parent when nothing local matches; a missing binding
    /// is `Ok(None)` for optional requests.
    pub(crate) fn resolve_in(
        &self,
        context: &InjectContext<'_>,
        guard: &CycleGuard,
    ) -> DiResult<Option<AnyArc>> {
        if let Some(binding) = self.select(context)? {
            return self.invoke(binding, context, guard).map(Some);
        }

        match self.parent() {
            Some(parent) => parent.resolve_in(context, guard),
            None if context.is_optional() => Ok(None),
            None => Err(DiError::NoBindingFound {
                key: context.key().clone(),
                requested_by: context.requesting_type(),
            }),
        }
    }

    /// Resolves every matching binding, in declaration order.
    ///
    /// Delegates to the parent only when nothing local matches.
    pub(crate) fn resolve_all_in(
        &self,
        context: &InjectContext<'_>,
        guard: &CycleGuard,
    ) -> DiResult<Vec<AnyArc>> {
        let matches: SmallVec<[&Binding; 4]> = self.inner.registry.find(context).collect();
        if matches.is_empty() {
            return match self.parent() {
                Some(parent) => parent.resolve_all_in(context, guard),
                None => Ok(Vec::new()),
            };
        }

        matches
            .into_iter()
            .map(|binding| self.invoke(binding, context, guard))
            .collect()
    }

    /// Picks the binding for a single-value request.
    ///
    /// One match wins outright. Among several, the first conditional one
    /// wins; several unconditional matches are ambiguous.
    fn select<'r>(&'r self, context: &'r InjectContext<'r>) -> DiResult<Option<&'r Binding>> {
        let matches: SmallVec<[&Binding; 4]> = self.inner.registry.find(context).collect();
        match matches.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            many => many
                .iter()
                .find(|binding| binding.is_conditional())
                .map(|binding| Some(*binding))
                .ok_or_else(|| DiError::AmbiguousBinding {
                    key: context.key().clone(),
                    count: many.len(),
                }),
        }
    }

    fn invoke(
        &self,
        binding: &Binding,
        context: &InjectContext<'_>,
        guard: &CycleGuard,
    ) -> DiResult<AnyArc> {
        let key = binding.key();
        let _frame = guard.enter(key)?;
        tracing::trace!(
            container = self.inner.options.display_name(),
            %key,
            depth = guard.depth(),
            "invoking provider"
        );

        let ctx = ResolverContext::new(self, context, guard, key.contract());
        let observers = &self.inner.observers;
        if observers.is_empty() {
            return binding.provider().provide(&ctx);
        }

        let start = Instant::now();
        observers.resolving(key);
        let result = binding.provider().provide(&ctx);
        match &result {
            Ok(_) => observers.resolved(key, start.elapsed()),
            Err(error) => observers.failed(key, error),
        }
        result
    }
}

impl ResolverCore for Container {
    fn resolve_erased(&self, key: ContractKey, optional: bool) -> DiResult<Option<AnyArc>> {
        let guard = CycleGuard::new(self.inner.options.max_depth);
        let root = InjectContext::root(key, optional);
        self.resolve_in(&root, &guard)
    }

    fn resolve_all_erased(&self, key: ContractKey) -> DiResult<Vec<AnyArc>> {
        let guard = CycleGuard::new(self.inner.options.max_depth);
        let root = InjectContext::root(key, false);
        self.resolve_all_in(&root, &guard)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.inner.options.display_name())
            .field("bindings", &self.inner.registry.len())
            .field("singletons", &self.inner.singletons.len())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        let pending = self.disposers.get_mut().len();
        if pending > 0 && self.options.warn_on_undisposed {
            tracing::warn!(
                container = self.options.display_name(),
                pending,
                "container dropped with undisposed resources; call dispose() before dropping"
            );
        }
    }
}
