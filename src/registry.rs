//! Binding storage.

use std::sync::Arc;

use crate::condition::BindingCondition;
use crate::context::InjectContext;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::key::ContractKey;
use crate::provider::{AnyArc, Provider, SingletonId};

/// A declared mapping from a contract key to a provider.
///
/// Immutable once registered; the condition list is fixed when the binder
/// finalizes it.
pub(crate) struct Binding {
    key: ContractKey,
    provider: Arc<Provider>,
    conditions: Vec<BindingCondition>,
}

impl Binding {
    pub(crate) fn new(key: ContractKey, provider: Provider, conditions: Vec<BindingCondition>) -> Self {
        Self {
            key,
            provider: Arc::new(provider),
            conditions,
        }
    }

    pub(crate) fn key(&self) -> &ContractKey {
        &self.key
    }

    pub(crate) fn provider(&self) -> &Provider {
        &self.provider
    }

    pub(crate) fn is_conditional(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Conditions are checked in declaration order; all must accept.
    pub(crate) fn matches(&self, context: &InjectContext<'_>) -> bool {
        self.conditions.iter().all(|c| c.matches(context))
    }

    pub(crate) fn descriptor(&self) -> BindingDescriptor {
        BindingDescriptor {
            key: self.key.clone(),
            kind: self.provider.kind(),
            singleton: self.provider.is_singleton(),
            concrete: self.provider.concrete(),
            conditions: self.conditions.len(),
        }
    }
}

pub(crate) type SameValue = Arc<dyn Fn(&AnyArc, &AnyArc) -> bool + Send + Sync>;

/// First instance declared through a single-instance binder.
struct SingleInstance {
    value: AnyArc,
    address: usize,
    same: Option<SameValue>,
}

/// Bindings of one container, in declaration order.
#[derive(Default)]
pub(crate) struct BindingRegistry {
    bindings: Vec<Binding>,
    index: Map<ContractKey, Vec<usize>>,
    single_instances: Map<SingletonId, SingleInstance>,
}

impl BindingRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `binding` to the sequence for its key.
    ///
    /// The only check made here is that the identical provider is not
    /// registered twice for the same key.
    pub(crate) fn register(&mut self, binding: Binding) -> DiResult<()> {
        let identity = binding.provider.identity();
        if self
            .bindings_for(&binding.key)
            .any(|existing| existing.provider.identity() == identity)
        {
            return Err(DiError::DuplicateBinding { key: binding.key });
        }

        let position = self.bindings.len();
        self.index
            .entry(binding.key.clone())
            .or_default()
            .push(position);
        self.bindings.push(binding);
        Ok(())
    }

    fn bindings_for<'r>(&'r self, key: &ContractKey) -> impl Iterator<Item = &'r Binding> + 'r {
        self.index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.bindings[i])
    }

    /// Bindings for the context's key whose conditions accept it, in
    /// declaration order.
    pub(crate) fn find<'r>(
        &'r self,
        context: &'r InjectContext<'r>,
    ) -> impl Iterator<Item = &'r Binding> + 'r {
        self.bindings_for(context.key())
            .filter(move |binding| binding.matches(context))
    }

    pub(crate) fn contains(&self, key: &ContractKey) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Records `value` as the single instance for `id`.
    ///
    /// Returns the instance bindings must use: `value` itself on first claim,
    /// or the first instance when `value` is that same instance (or equal to
    /// it, if the first claim opted into value equality). Any other instance
    /// is a duplicate.
    pub(crate) fn claim_single_instance(
        &mut self,
        id: SingletonId,
        key: &ContractKey,
        value: AnyArc,
        address: usize,
        same: Option<SameValue>,
    ) -> DiResult<AnyArc> {
        if let Some(first) = self.single_instances.get(&id) {
            let equal = first.address == address
                || first.same.as_ref().is_some_and(|same| same(&first.value, &value));
            return if equal {
                Ok(first.value.clone())
            } else {
                Err(DiError::DuplicateSingletonInstance { key: key.clone() })
            };
        }

        self.single_instances.insert(
            id,
            SingleInstance {
                value: value.clone(),
                address,
                same,
            },
        );
        Ok(value)
    }
}
