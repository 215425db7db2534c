//! Constructor injection and contract conversion.

use std::sync::Arc;

use crate::container::ResolverContext;
use crate::error::FactoryResult;

/// A concrete type the container can build by resolving its dependencies.
///
/// Every dependency requested through `ctx` inside `construct` is a nested
/// request whose requesting type is `Self`, which is what conditional
/// bindings such as `when_injected_into` look at.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, FactoryResult, Injectable, Resolver, ResolverContext};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// struct UserService { db: Arc<Database> }
///
/// impl Injectable for UserService {
///     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
///         Ok(Self { db: ctx.resolve()? })
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<Database>()
///     .to_instance(Arc::new(Database { url: "postgres://localhost".into() }))
///     .unwrap();
/// builder.bind::<UserService>().to_transient::<UserService>().unwrap();
///
/// let container = builder.build();
/// let users = container.resolve::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Builds a new instance, resolving dependencies through `ctx`.
    fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self>;
}

/// Declares that `Self` can stand in for contract `C`.
///
/// This is the capability check done once at declaration time: a binding
/// from `C` to a concrete type only compiles when the concrete type
/// implements `Implements<C>`. Every type implements it for itself; use
/// [`implements!`](crate::implements) for trait object contracts.
pub trait Implements<C: ?Sized>: Send + Sync + 'static {
    /// Converts a shared instance into the contract.
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

impl<T: ?Sized + Send + Sync + 'static> Implements<T> for T {
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implements [`Implements`] for a concrete type and one or more trait
/// object contracts.
///
/// ```
/// use bindery::implements;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $concrete {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}
