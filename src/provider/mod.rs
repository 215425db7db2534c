//! Provider strategies.
//!
//! A provider is what actually produces the value for a binding. Every
//! variant is driven through the same `provide` call; the container never
//! needs to know which one it is invoking.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::builder::Installer;
use crate::container::ResolverContext;
use crate::descriptors::ProviderKind;
use crate::error::{DiError, DiResult};
use crate::key::{ContractKey, TypeInfo};
use crate::traits::{Factory, Implements, Injectable};

pub(crate) mod facade;
pub(crate) mod singleton;

pub(crate) use facade::FacadeProvider;
pub(crate) use singleton::{SingletonCache, SingletonId};

/// Type-erased shared value as stored by the container.
///
/// A value of contract `C` is always stored as an `Arc<C>` wrapped in this
/// outer `Arc`, which lets unsized contracts such as `dyn Trait` travel
/// through the same channel as concrete types.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type Caster = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

#[inline]
pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyArc {
    Arc::new(value)
}

#[inline]
pub(crate) fn unerase<T: ?Sized + Send + Sync + 'static>(value: AnyArc) -> DiResult<Arc<T>> {
    value
        .downcast::<Arc<T>>()
        .map(|boxed| (*boxed).clone())
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

fn next_provider_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Identity used to reject registering the same provider twice for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProviderIdentity {
    Instance(usize),
    Singleton(SingletonId),
    Unique(u64),
}

pub(crate) enum Strategy {
    /// Returns a held value verbatim.
    Instance { value: AnyArc, address: usize },
    /// Builds a fresh concrete value with constructor injection.
    Transient { concrete: TypeInfo, ctor: Ctor },
    /// Calls a user function.
    Method { ctor: Ctor },
    /// Builds a factory object (or uses a supplied one) and asks it to create.
    Factory { factory: TypeInfo, ctor: Ctor },
    /// Resolves another key and projects a value out of it.
    Getter { source: ContractKey, ctor: Ctor },
    /// Resolves another key and hands its value out as this contract.
    Resolve { target: ContractKey, ctor: Ctor },
    /// Lazily built sub-container producing the concrete type.
    Facade(FacadeProvider),
    /// Caches the inner strategy's first successful value per container.
    Singleton {
        id: SingletonId,
        inner: Box<Strategy>,
        cast: Option<Caster>,
    },
}

/// A provider: one strategy plus the identity used for duplicate checks.
pub(crate) struct Provider {
    uid: u64,
    strategy: Strategy,
}

impl Provider {
    fn new(strategy: Strategy) -> Self {
        Self {
            uid: next_provider_id(),
            strategy,
        }
    }

    pub(crate) fn instance<C: ?Sized + Send + Sync + 'static>(value: Arc<C>) -> Self {
        let address = Arc::as_ptr(&value) as *const () as usize;
        Self::new(Strategy::Instance {
            value: erase(value),
            address,
        })
    }

    pub(crate) fn transient<T, C>() -> Self
    where
        T: Injectable + Implements<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let build = constructor::<T>();
        let cast = caster::<T, C>();
        Self::new(Strategy::Transient {
            concrete: TypeInfo::of::<T>(),
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| cast(build(ctx)?)),
        })
    }

    /// Singleton over a concrete type. Every binding declared with the same
    /// concrete type and concrete identifier in one container shares it.
    pub(crate) fn single<T, C>(concrete_id: Option<Arc<str>>) -> Self
    where
        T: Injectable + Implements<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let concrete = TypeInfo::of::<T>();
        Self::new(Strategy::Transient {
            concrete,
            ctor: constructor::<T>(),
        })
        .into_concrete_singleton::<T, C>(concrete_id)
    }

    pub(crate) fn method<C, F>(method: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> crate::FactoryResult<Arc<C>> + Send + Sync + 'static,
    {
        Self::new(Strategy::Method {
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| {
                method(ctx)
                    .map(erase)
                    .map_err(|e| ctx.construction_error(e))
            }),
        })
    }

    pub(crate) fn factory<F, C>() -> Self
    where
        F: Injectable + Factory<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let factory = TypeInfo::of::<F>();
        Self::new(Strategy::Factory {
            factory,
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| {
                let ctx = ctx.for_requester(factory);
                let built = F::construct(&ctx).map_err(|e| ctx.construction_error(e))?;
                built
                    .create(&ctx)
                    .map(erase)
                    .map_err(|e| ctx.construction_error(e))
            }),
        })
    }

    pub(crate) fn factory_instance<C>(factory: Arc<dyn Factory<C>>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self::new(Strategy::Factory {
            factory: TypeInfo::of::<dyn Factory<C>>(),
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| {
                factory
                    .create(ctx)
                    .map(erase)
                    .map_err(|e| ctx.construction_error(e))
            }),
        })
    }

    pub(crate) fn getter<S, C, F>(source: ContractKey, project: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&S) -> Arc<C> + Send + Sync + 'static,
    {
        let key = source.clone();
        Self::new(Strategy::Getter {
            source,
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| {
                let value = unerase::<S>(ctx.resolve_required(key.clone())?)?;
                Ok(erase(project(&value)))
            }),
        })
    }

    pub(crate) fn resolve<T, C>(target: ContractKey) -> Self
    where
        T: ?Sized + Implements<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let key = target.clone();
        Self::new(Strategy::Resolve {
            target,
            ctor: Arc::new(move |ctx: &ResolverContext<'_>| {
                let value = unerase::<T>(ctx.resolve_required(key.clone())?)?;
                Ok(erase(<T as Implements<C>>::upcast(value)))
            }),
        })
    }

    /// Facade building `T` inside a child container populated by `installer`.
    pub(crate) fn facade<T, C>(installer: Box<dyn Installer + Send + Sync>) -> Self
    where
        T: Injectable + Implements<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let build = constructor::<T>();
        let cast = caster::<T, C>();
        Self::new(Strategy::Facade(FacadeProvider::new(
            TypeInfo::of::<T>(),
            installer,
            Arc::new(move |ctx: &ResolverContext<'_>| cast(build(ctx)?)),
        )))
    }

    /// Wraps this provider so its first successful value is cached.
    ///
    /// The singleton is identified by this provider alone.
    pub(crate) fn into_singleton(self) -> Self {
        let uid = self.uid;
        Self {
            uid,
            strategy: Strategy::Singleton {
                id: SingletonId::Provider(uid),
                inner: Box::new(self.strategy),
                cast: None,
            },
        }
    }

    /// Wraps a provider yielding erased `Arc<T>` values into a singleton
    /// shared by every binding with the same `(T, concrete_id)`, casting the
    /// cached value to `C` per binding.
    pub(crate) fn into_concrete_singleton<T, C>(self, concrete_id: Option<Arc<str>>) -> Self
    where
        T: ?Sized + Implements<C>,
        C: ?Sized + Send + Sync + 'static,
    {
        let uid = self.uid;
        Self {
            uid,
            strategy: Strategy::Singleton {
                id: SingletonId::Concrete {
                    concrete: TypeInfo::of::<T>(),
                    identifier: concrete_id,
                },
                inner: Box::new(self.strategy),
                cast: Some(caster::<T, C>()),
            },
        }
    }

    pub(crate) fn identity(&self) -> ProviderIdentity {
        match &self.strategy {
            Strategy::Instance { address, .. } => ProviderIdentity::Instance(*address),
            Strategy::Singleton { id, .. } => ProviderIdentity::Singleton(id.clone()),
            _ => ProviderIdentity::Unique(self.uid),
        }
    }

    pub(crate) fn kind(&self) -> ProviderKind {
        self.strategy.kind()
    }

    pub(crate) fn is_singleton(&self) -> bool {
        matches!(self.strategy, Strategy::Singleton { .. })
    }

    pub(crate) fn concrete(&self) -> Option<TypeInfo> {
        self.strategy.concrete()
    }

    /// Produces one value for the request described by `ctx`.
    pub(crate) fn provide(&self, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        self.strategy.provide(ctx)
    }
}

impl Strategy {
    fn provide(&self, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        match self {
            Strategy::Instance { value, .. } => Ok(value.clone()),
            Strategy::Transient { ctor, .. }
            | Strategy::Method { ctor }
            | Strategy::Factory { ctor, .. }
            | Strategy::Getter { ctor, .. }
            | Strategy::Resolve { ctor, .. } => ctor(ctx),
            Strategy::Facade(facade) => facade.provide(ctx),
            Strategy::Singleton { id, inner, cast } => {
                let value = ctx
                    .container()
                    .singletons()
                    .get_or_try_init(id, ctx.guard(), || inner.provide(ctx))?;
                match cast {
                    Some(cast) => cast(value),
                    None => Ok(value),
                }
            }
        }
    }

    fn kind(&self) -> ProviderKind {
        match self {
            Strategy::Instance { .. } => ProviderKind::Instance,
            Strategy::Transient { .. } => ProviderKind::Constructor,
            Strategy::Method { .. } => ProviderKind::Method,
            Strategy::Factory { .. } => ProviderKind::Factory,
            Strategy::Getter { .. } => ProviderKind::Getter,
            Strategy::Resolve { .. } => ProviderKind::Resolve,
            Strategy::Facade(_) => ProviderKind::Facade,
            Strategy::Singleton { inner, .. } => inner.kind(),
        }
    }

    fn concrete(&self) -> Option<TypeInfo> {
        match self {
            Strategy::Transient { concrete, .. } => Some(*concrete),
            Strategy::Factory { factory, .. } => Some(*factory),
            Strategy::Getter { source, .. } => Some(source.contract()),
            Strategy::Resolve { target, .. } => Some(target.contract()),
            Strategy::Facade(facade) => Some(facade.concrete()),
            Strategy::Singleton { inner, .. } => inner.concrete(),
            Strategy::Instance { .. } | Strategy::Method { .. } => None,
        }
    }
}

/// Constructor for `T` with injection; yields the erased concrete `Arc<T>`.
pub(crate) fn constructor<T: Injectable>() -> Ctor {
    let concrete = TypeInfo::of::<T>();
    Arc::new(move |ctx: &ResolverContext<'_>| {
        let ctx = ctx.for_requester(concrete);
        T::construct(&ctx)
            .map(|value| erase(Arc::new(value)))
            .map_err(|e| ctx.construction_error(e))
    })
}

/// Converts an erased `Arc<T>` into an erased `Arc<C>`.
pub(crate) fn caster<T, C>() -> Caster
where
    T: ?Sized + Implements<C>,
    C: ?Sized + Send + Sync + 'static,
{
    Arc::new(|value: AnyArc| {
        Ok(erase(<T as Implements<C>>::upcast(unerase::<T>(value)?)))
    })
}
