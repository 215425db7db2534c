//! Per-request resolution metadata.

use crate::key::{ContractKey, TypeInfo};

/// Immutable description of one resolution request.
///
/// A fresh context is created for every resolution step. Nested requests
/// borrow their parent, so the chain back to the root request lives on the
/// call stack and is never stored by the container.
///
/// Binding conditions receive the context to decide whether a binding
/// applies; errors use it to report who asked for what.
#[derive(Debug, Clone)]
pub struct InjectContext<'a> {
    key: ContractKey,
    requesting_type: Option<TypeInfo>,
    parent: Option<&'a InjectContext<'a>>,
    optional: bool,
}

impl InjectContext<'static> {
    /// Context for a request made directly against a container.
    pub fn root(key: ContractKey, optional: bool) -> Self {
        Self {
            key,
            requesting_type: None,
            parent: None,
            optional,
        }
    }
}

impl<'a> InjectContext<'a> {
    /// Context for a dependency requested while building `requesting_type`
    /// on behalf of `self`.
    pub fn child(
        &'a self,
        key: ContractKey,
        requesting_type: Option<TypeInfo>,
        optional: bool,
    ) -> InjectContext<'a> {
        InjectContext {
            key,
            requesting_type,
            parent: Some(self),
            optional,
        }
    }

    /// The requested contract key.
    pub fn key(&self) -> &ContractKey {
        &self.key
    }

    /// The contract identifier of the request, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.key.identifier()
    }

    /// The type whose construction triggered this request; `None` for root
    /// requests.
    pub fn requesting_type(&self) -> Option<TypeInfo> {
        self.requesting_type
    }

    /// The request that caused this one.
    pub fn parent(&self) -> Option<&'a InjectContext<'a>> {
        self.parent
    }

    /// When set, a missing binding yields an absent value instead of an error.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// This context followed by its parents up to the root request.
    pub fn ancestors(&self) -> impl Iterator<Item = &InjectContext<'a>> + '_ {
        std::iter::successors(Some(self), |ctx| ctx.parent)
    }

    /// Number of requests between this one and the root (root is 0).
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Returns true if `T` is being built anywhere along the chain.
    pub fn is_within<T: ?Sized + 'static>(&self) -> bool {
        self.ancestors()
            .any(|ctx| ctx.requesting_type.is_some_and(|t| t.is::<T>()))
    }
}
