//! Resolver traits for contract resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::ContractKey;
use crate::provider::{unerase, AnyArc};

/// Core resolver trait for object-safe resolution.
///
/// Implemented by [`Container`](crate::Container) for root requests and by
/// [`ResolverContext`](crate::ResolverContext) for nested requests made while
/// building a value. Most users should use the [`Resolver`] trait instead,
/// which provides typed generic methods on top of this one.
pub trait ResolverCore {
    /// Resolves one value for `key`.
    ///
    /// With `optional` set a missing binding yields `Ok(None)`; otherwise it
    /// is a [`DiError::NoBindingFound`].
    fn resolve_erased(&self, key: ContractKey, optional: bool) -> DiResult<Option<AnyArc>>;

    /// Resolves every matching binding for `key`, in declaration order.
    fn resolve_all_erased(&self, key: ContractKey) -> DiResult<Vec<AnyArc>>;
}

/// High-level resolver interface with typed methods.
///
/// Contracts may be concrete types or trait objects; values always come back
/// as `Arc<C>`.
///
/// # Examples
///
/// ```
/// use bindery::{implements, ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String { format!("LOG: {msg}") }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<usize>().to_instance(Arc::new(42)).unwrap();
/// builder.bind::<dyn Logger>().to_instance(Arc::new(ConsoleLogger)).unwrap();
///
/// let container = builder.build();
/// assert_eq!(*container.resolve::<usize>().unwrap(), 42);
/// assert_eq!(container.resolve::<dyn Logger>().unwrap().log("hi"), "LOG: hi");
/// assert!(container.try_resolve::<String>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves contract `C` without identifier.
    fn resolve<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<C>> {
        self.resolve_key(ContractKey::of::<C>())
    }

    /// Resolves contract `C` bound under `identifier`.
    fn resolve_named<C: ?Sized + Send + Sync + 'static>(&self, identifier: &str) -> DiResult<Arc<C>> {
        self.resolve_key(ContractKey::named::<C>(identifier))
    }

    /// Resolves contract `C`, or `None` when nothing is bound.
    ///
    /// Only a missing binding is turned into `None`; every other failure,
    /// including failures of nested dependencies, is still an error.
    fn try_resolve<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Option<Arc<C>>> {
        self.try_resolve_key(ContractKey::of::<C>())
    }

    /// Optional resolution of contract `C` bound under `identifier`.
    fn try_resolve_named<C: ?Sized + Send + Sync + 'static>(
        &self,
        identifier: &str,
    ) -> DiResult<Option<Arc<C>>> {
        self.try_resolve_key(ContractKey::named::<C>(identifier))
    }

    /// Resolves every binding of contract `C`, in declaration order.
    fn resolve_all<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Vec<Arc<C>>> {
        self.resolve_all_key(ContractKey::of::<C>())
    }

    /// Resolves every binding of contract `C` under `identifier`.
    fn resolve_all_named<C: ?Sized + Send + Sync + 'static>(
        &self,
        identifier: &str,
    ) -> DiResult<Vec<Arc<C>>> {
        self.resolve_all_key(ContractKey::named::<C>(identifier))
    }

    /// Resolves `key`, which must name contract `C`.
    fn resolve_key<C: ?Sized + Send + Sync + 'static>(&self, key: ContractKey) -> DiResult<Arc<C>> {
        match self.resolve_erased(key.clone(), false)? {
            Some(value) => unerase::<C>(value),
            None => Err(DiError::NoBindingFound {
                key,
                requested_by: None,
            }),
        }
    }

    /// Optional resolution of `key`, which must name contract `C`.
    fn try_resolve_key<C: ?Sized + Send + Sync + 'static>(
        &self,
        key: ContractKey,
    ) -> DiResult<Option<Arc<C>>> {
        self.resolve_erased(key, true)?
            .map(unerase::<C>)
            .transpose()
    }

    /// Resolves every binding of `key`, which must name contract `C`.
    fn resolve_all_key<C: ?Sized + Send + Sync + 'static>(
        &self,
        key: ContractKey,
    ) -> DiResult<Vec<Arc<C>>> {
        self.resolve_all_erased(key)?
            .into_iter()
            .map(unerase::<C>)
            .collect()
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
