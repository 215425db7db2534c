//! Resolver context handed to construction code.

use std::sync::Arc;

use crate::context::InjectContext;
use crate::error::{BoxError, DiError, DiResult};
use crate::internal::CycleGuard;
use crate::key::{ContractKey, TypeInfo};
use crate::provider::AnyArc;
use crate::traits::{Dispose, Injectable, ResolverCore};

use super::Container;

/// Context passed to constructors, methods and factories for resolving
/// their dependencies.
///
/// Every request made through it is a nested request: its [`InjectContext`]
/// points back to the request being served and names the type being built
/// as requester, and it shares the cycle guard of the enclosing resolve.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Database>()
///     .to_instance(Arc::new(Database { url: "postgres://localhost".into() }))
///     .unwrap();
/// builder.bind::<UserService>().to_method(|ctx| {
///     Ok(Arc::new(UserService { db: ctx.resolve()? }))
/// }).unwrap();
///
/// let container = builder.build();
/// assert_eq!(container.resolve::<UserService>().unwrap().db.url, "postgres://localhost");
/// ```
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    container: &'a Container,
    context: &'a InjectContext<'a>,
    guard: &'a CycleGuard,
    requester: TypeInfo,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(
        container: &'a Container,
        context: &'a InjectContext<'a>,
        guard: &'a CycleGuard,
        requester: TypeInfo,
    ) -> Self {
        Self {
            container,
            context,
            guard,
            requester,
        }
    }

    /// The request currently being served.
    pub fn context(&self) -> &'a InjectContext<'a> {
        self.context
    }

    /// The container that owns the binding being served.
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The type reported as requester of nested requests.
    pub fn requester(&self) -> TypeInfo {
        self.requester
    }

    pub(crate) fn guard(&self) -> &'a CycleGuard {
        self.guard
    }

    pub(crate) fn for_requester(&self, requester: TypeInfo) -> ResolverContext<'a> {
        ResolverContext { requester, ..*self }
    }

    pub(crate) fn for_container<'c>(&'c self, container: &'c Container) -> ResolverContext<'c> {
        ResolverContext {
            container,
            context: self.context,
            guard: self.guard,
            requester: self.requester,
        }
    }

    /// Builds an unbound `T`, injecting its dependencies from this context.
    pub fn instantiate<T: Injectable>(&self) -> DiResult<T> {
        let ctx = self.for_requester(TypeInfo::of::<T>());
        T::construct(&ctx).map_err(|e| ctx.construction_error(e))
    }

    /// Queues `service` for disposal when the owning container is disposed.
    ///
    /// Hooks run in LIFO order. Each hook keeps its service alive until
    /// [`Container::dispose`] runs, so register from singleton providers
    /// only: a transient provider registering on every call grows the queue
    /// without bound.
    pub fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.container
            .push_disposer(Box::new(move || service.dispose()));
    }

    /// Maps a failure of user construction code for the current request.
    pub(crate) fn construction_error(&self, error: BoxError) -> DiError {
        DiError::from_factory(error, self.context.key(), self.context.requesting_type())
    }

    pub(crate) fn resolve_required(&self, key: ContractKey) -> DiResult<AnyArc> {
        // Required requests fail inside `resolve_in`; they never come back empty.
        self.resolve_erased(key.clone(), false)?
            .ok_or(DiError::NoBindingFound {
                key,
                requested_by: Some(self.requester),
            })
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_erased(&self, key: ContractKey, optional: bool) -> DiResult<Option<AnyArc>> {
        let nested = self.context.child(key, Some(self.requester), optional);
        self.container.resolve_in(&nested, self.guard)
    }

    fn resolve_all_erased(&self, key: ContractKey) -> DiResult<Vec<AnyArc>> {
        let nested = self.context.child(key, Some(self.requester), false);
        self.container.resolve_all_in(&nested, self.guard)
    }
}
