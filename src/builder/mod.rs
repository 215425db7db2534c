//! Declaration surface: the container builder and its binders.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::condition::BindingCondition;
use crate::config::ContainerOptions;
use crate::container::{Container, ResolverContext};
use crate::context::InjectContext;
use crate::error::{DiResult, FactoryResult};
use crate::key::{ContractKey, TypeInfo};
use crate::observer::{DiObserver, Observers};
use crate::provider::{erase, unerase, AnyArc, Provider, SingletonId};
use crate::registry::{Binding, BindingRegistry, SameValue};
use crate::traits::{Factory, Implements, Injectable};

mod installer;

pub use installer::Installer;

/// Collects bindings and builds an immutable [`Container`].
///
/// # Examples
///
/// ```
/// use bindery::{implements, ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// struct French;
/// impl Greeter for French {
///     fn greet(&self) -> String { "bonjour".into() }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<dyn Greeter>().to_instance(Arc::new(English)).unwrap();
/// builder.bind::<dyn Greeter>().with_id("fr").to_instance(Arc::new(French)).unwrap();
///
/// let container = builder.build();
/// assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "hello");
/// assert_eq!(container.resolve_named::<dyn Greeter>("fr").unwrap().greet(), "bonjour");
/// ```
pub struct ContainerBuilder {
    registry: BindingRegistry,
    parent: Option<Container>,
    observers: Observers,
    options: ContainerOptions,
}

impl ContainerBuilder {
    /// Creates an empty builder for a root container.
    pub fn new() -> Self {
        Self {
            registry: BindingRegistry::new(),
            parent: None,
            observers: Observers::default(),
            options: ContainerOptions::default(),
        }
    }

    /// Builder for the private container of the facade over `facade`.
    pub(crate) fn child_of(parent: &Container, facade: TypeInfo) -> Self {
        let short = facade.name().rsplit("::").next().unwrap_or(facade.name());
        Self {
            registry: BindingRegistry::new(),
            parent: Some(parent.clone()),
            observers: parent.observers().clone(),
            options: parent.options().for_child(short),
        }
    }

    /// Starts a binding for contract `C`.
    pub fn bind<C: ?Sized + Send + Sync + 'static>(&mut self) -> Binder<'_, C> {
        Binder {
            builder: self,
            identifier: None,
            conditions: Vec::new(),
            contract: PhantomData,
        }
    }

    /// Replaces the options of the container being built.
    pub fn with_options(&mut self, options: ContainerOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Adds an observer for resolution events.
    ///
    /// Observers are inherited by facade containers created later.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Applies an installer to this builder.
    pub fn install<I: Installer + ?Sized>(&mut self, installer: &I) -> DiResult<&mut Self> {
        installer.install(self)?;
        Ok(self)
    }

    /// Number of bindings declared so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub(crate) fn register_binding(&mut self, binding: Binding) -> DiResult<()> {
        self.registry.register(binding)
    }

    /// Builds the container. No further bindings can be added afterwards.
    pub fn build(self) -> Container {
        tracing::debug!(
            container = self.options.display_name(),
            bindings = self.registry.len(),
            child = self.parent.is_some(),
            "container built"
        );
        Container::new(
            self.registry,
            self.parent.as_ref(),
            self.observers,
            self.options,
        )
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates identifier and conditions for one binding of contract `C`,
/// then registers it through one of the `to_*` finalizers.
///
/// Each finalizer registers exactly one binding. The only declaration-time
/// failures are registering the identical provider twice for the same key
/// and declaring a second, different single instance.
#[must_use = "a binder does nothing until a `to_*` finalizer is called"]
pub struct Binder<'b, C: ?Sized> {
    builder: &'b mut ContainerBuilder,
    identifier: Option<Arc<str>>,
    conditions: Vec<BindingCondition>,
    contract: PhantomData<fn() -> Arc<C>>,
}

impl<'b, C: ?Sized + Send + Sync + 'static> Binder<'b, C> {
    /// Binds under `identifier` instead of the plain contract.
    pub fn with_id(mut self, identifier: impl Into<Arc<str>>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Adds a condition; the binding applies only when all accept.
    pub fn when(mut self, condition: BindingCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a condition from a predicate over the request.
    pub fn when_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&InjectContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.when(BindingCondition::new(predicate))
    }

    /// Applies only to dependencies of `T`.
    pub fn when_injected_into<T: ?Sized + 'static>(self) -> Self {
        self.when(BindingCondition::injected_into::<T>())
    }

    /// Applies only to dependencies of any of `types`.
    pub fn when_injected_into_any(self, types: &[TypeInfo]) -> Self {
        self.when(BindingCondition::injected_into_any(types))
    }

    fn key(&self) -> ContractKey {
        ContractKey::from_parts(TypeInfo::of::<C>(), self.identifier.clone())
    }

    fn finish(self, provider: Provider) -> DiResult<()> {
        let binding = Binding::new(self.key(), provider, self.conditions);
        self.builder.register_binding(binding)
    }

    /// Always hands out `value`.
    pub fn to_instance(self, value: Arc<C>) -> DiResult<()> {
        self.finish(Provider::instance(value))
    }

    /// Hands out `value`, which must be the only instance of `T` declared as
    /// a single instance in this builder.
    ///
    /// Declaring the same `Arc` again for another contract is allowed; a
    /// different instance fails with
    /// [`DuplicateSingletonInstance`](crate::DiError::DuplicateSingletonInstance).
    pub fn to_single_instance<T: Implements<C>>(self, value: Arc<T>) -> DiResult<()> {
        self.single_instance(None, value, None)
    }

    /// Like [`to_single_instance`](Self::to_single_instance), tracked under
    /// `concrete_id`: each concrete identifier may hold its own instance of
    /// `T`.
    pub fn to_single_instance_named<T: Implements<C>>(
        self,
        concrete_id: impl Into<Arc<str>>,
        value: Arc<T>,
    ) -> DiResult<()> {
        self.single_instance(Some(concrete_id.into()), value, None)
    }

    /// Like [`to_single_instance`](Self::to_single_instance), but an equal
    /// value is accepted as the same instance and the first one is shared.
    pub fn to_single_instance_by_value<T>(self, value: Arc<T>) -> DiResult<()>
    where
        T: Implements<C> + PartialEq,
    {
        let same: SameValue = Arc::new(|a: &AnyArc, b: &AnyArc| {
            match ((**a).downcast_ref::<Arc<T>>(), (**b).downcast_ref::<Arc<T>>()) {
                (Some(a), Some(b)) => **a == **b,
                _ => false,
            }
        });
        self.single_instance(None, value, Some(same))
    }

    fn single_instance<T: Implements<C>>(
        self,
        concrete_id: Option<Arc<str>>,
        value: Arc<T>,
        same: Option<SameValue>,
    ) -> DiResult<()> {
        let id = SingletonId::Concrete {
            concrete: TypeInfo::of::<T>(),
            identifier: concrete_id,
        };
        let key = self.key();
        let address = Arc::as_ptr(&value) as *const () as usize;
        let first = self
            .builder
            .registry
            .claim_single_instance(id, &key, erase(value), address, same)?;
        let first = unerase::<T>(first)?;
        self.finish(Provider::instance(<T as Implements<C>>::upcast(first)))
    }

    /// Builds one `T` per container on first use and shares it.
    ///
    /// Every contract bound with `to_single::<T>()` in the same container
    /// gets the same instance.
    pub fn to_single<T>(self) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
    {
        self.finish(Provider::single::<T, C>(None))
    }

    /// Like [`to_single`](Self::to_single), with a separate instance per
    /// concrete identifier.
    pub fn to_single_named<T>(self, concrete_id: impl Into<Arc<str>>) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
    {
        self.finish(Provider::single::<T, C>(Some(concrete_id.into())))
    }

    /// Builds a fresh `T` on every request.
    pub fn to_transient<T>(self) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
    {
        self.finish(Provider::transient::<T, C>())
    }

    /// Calls `method` on every request.
    pub fn to_method<F>(self, method: F) -> DiResult<()>
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> FactoryResult<Arc<C>> + Send + Sync + 'static,
    {
        self.finish(Provider::method(method))
    }

    /// Calls `method` once per container and shares its value.
    pub fn to_single_method<F>(self, method: F) -> DiResult<()>
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> FactoryResult<Arc<C>> + Send + Sync + 'static,
    {
        self.finish(Provider::method(method).into_singleton())
    }

    /// Calls `method` once per `(T, concrete_id)` in the container.
    ///
    /// Every binding declared with the same concrete type and identifier,
    /// through this or any other `_named` single finalizer, shares the value.
    pub fn to_single_method_named<T, F>(self, concrete_id: impl Into<Arc<str>>, method: F) -> DiResult<()>
    where
        T: ?Sized + Implements<C>,
        F: for<'a> Fn(&ResolverContext<'a>) -> FactoryResult<Arc<T>> + Send + Sync + 'static,
    {
        self.finish(Provider::method::<T, F>(method).into_concrete_singleton::<T, C>(Some(concrete_id.into())))
    }

    /// Builds an `F` with injection on every request and asks it to create.
    pub fn to_factory<F>(self) -> DiResult<()>
    where
        F: Injectable + Factory<C>,
    {
        self.finish(Provider::factory::<F, C>())
    }

    /// Like [`to_factory`](Self::to_factory), once per container.
    pub fn to_single_factory<F>(self) -> DiResult<()>
    where
        F: Injectable + Factory<C>,
    {
        self.finish(Provider::factory::<F, C>().into_singleton())
    }

    /// Like [`to_single_factory`](Self::to_single_factory), shared by every
    /// binding of contract `C` under `concrete_id`.
    pub fn to_single_factory_named<F>(self, concrete_id: impl Into<Arc<str>>) -> DiResult<()>
    where
        F: Injectable + Factory<C>,
    {
        self.finish(Provider::factory::<F, C>().into_concrete_singleton::<C, C>(Some(concrete_id.into())))
    }

    /// Builds an `F` once to create a `T`, shared by every binding to the
    /// concrete `T` in the container.
    pub fn to_single_factory_of<F, T>(self) -> DiResult<()>
    where
        F: Injectable + Factory<T>,
        T: ?Sized + Implements<C>,
    {
        self.finish(Provider::factory::<F, T>().into_concrete_singleton::<T, C>(None))
    }

    /// Like [`to_single_factory_of`](Self::to_single_factory_of), with a
    /// separate instance per concrete identifier.
    pub fn to_single_factory_of_named<F, T>(self, concrete_id: impl Into<Arc<str>>) -> DiResult<()>
    where
        F: Injectable + Factory<T>,
        T: ?Sized + Implements<C>,
    {
        self.finish(Provider::factory::<F, T>().into_concrete_singleton::<T, C>(Some(concrete_id.into())))
    }

    /// Delegates every request to an externally supplied factory.
    pub fn to_factory_instance(self, factory: Arc<dyn Factory<C>>) -> DiResult<()> {
        self.finish(Provider::factory_instance(factory))
    }

    /// Resolves `S` and projects the value out of it.
    pub fn to_getter<S, F>(self, project: F) -> DiResult<()>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&S) -> Arc<C> + Send + Sync + 'static,
    {
        self.finish(Provider::getter(ContractKey::of::<S>(), project))
    }

    /// Resolves `S` under `source_id` and projects the value out of it.
    pub fn to_getter_named<S, F>(self, source_id: impl Into<Arc<str>>, project: F) -> DiResult<()>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&S) -> Arc<C> + Send + Sync + 'static,
    {
        self.finish(Provider::getter(ContractKey::named::<S>(source_id), project))
    }

    /// Resolves `T` through its own bindings and hands it out as `C`.
    pub fn to_resolve<T>(self) -> DiResult<()>
    where
        T: ?Sized + Implements<C>,
    {
        self.finish(Provider::resolve::<T, C>(ContractKey::of::<T>()))
    }

    /// Resolves `T` under `target_id` and hands it out as `C`.
    pub fn to_resolve_named<T>(self, target_id: impl Into<Arc<str>>) -> DiResult<()>
    where
        T: ?Sized + Implements<C>,
    {
        self.finish(Provider::resolve::<T, C>(ContractKey::named::<T>(target_id)))
    }

    /// Builds `T` once inside a private child container populated by
    /// `install`.
    ///
    /// The child falls back to this container for anything it does not bind.
    /// Its bindings, singletons included, are invisible outside of it.
    pub fn to_single_facade_method<T, I>(self, install: I) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
        I: Fn(&mut ContainerBuilder) -> DiResult<()> + Send + Sync + 'static,
    {
        self.finish(Provider::facade::<T, C>(Box::new(install)).into_singleton())
    }

    /// Like [`to_single_facade_method`](Self::to_single_facade_method), with
    /// the child populated by a default-constructed installer `I`.
    pub fn to_single_facade_installer<T, I>(self) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
        I: Installer + Default + Send + Sync + 'static,
    {
        self.finish(Provider::facade::<T, C>(Box::new(I::default())).into_singleton())
    }

    /// Like [`to_single_facade_method`](Self::to_single_facade_method), with
    /// the facade and its `T` shared by every binding to `(T, concrete_id)`.
    pub fn to_single_facade_method_named<T, I>(self, concrete_id: impl Into<Arc<str>>, install: I) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
        I: Fn(&mut ContainerBuilder) -> DiResult<()> + Send + Sync + 'static,
    {
        self.finish(
            Provider::facade::<T, T>(Box::new(install)).into_concrete_singleton::<T, C>(Some(concrete_id.into())),
        )
    }

    /// Like [`to_single_facade_installer`](Self::to_single_facade_installer),
    /// shared by every binding to `(T, concrete_id)`.
    pub fn to_single_facade_installer_named<T, I>(self, concrete_id: impl Into<Arc<str>>) -> DiResult<()>
    where
        T: Injectable + Implements<C>,
        I: Installer + Default + Send + Sync + 'static,
    {
        self.finish(
            Provider::facade::<T, T>(Box::new(I::default())).into_concrete_singleton::<T, C>(Some(concrete_id.into())),
        )
    }
}
