//! Binding conditions: predicates over the request context.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::context::InjectContext;
use crate::key::TypeInfo;

type Predicate = Arc<dyn Fn(&InjectContext<'_>) -> bool + Send + Sync>;

/// Predicate deciding whether a binding applies to a request.
///
/// Conditions are stateless and owned by the binding they were attached to.
/// A binding with several conditions applies only when all of them accept
/// the request; they are evaluated in declaration order.
///
/// # Examples
///
/// ```rust
/// use bindery::{BindingCondition, InjectContext, TypeInfo, key_of};
///
/// struct Renderer;
/// struct Texture;
///
/// let cond = BindingCondition::injected_into::<Renderer>();
///
/// let root = InjectContext::root(key_of::<Renderer>(), false);
/// let dep = root.child(key_of::<Texture>(), Some(TypeInfo::of::<Renderer>()), false);
///
/// assert!(cond.matches(&dep));
/// assert!(!cond.matches(&root));
/// ```
#[derive(Clone)]
pub struct BindingCondition {
    predicate: Predicate,
    description: Cow<'static, str>,
}

impl BindingCondition {
    /// Condition from an arbitrary predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&InjectContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::described("custom", predicate)
    }

    /// Condition from a predicate, with a description for diagnostics.
    pub fn described<F>(description: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&InjectContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            description: description.into(),
        }
    }

    /// Applies only when the direct requester is `T`.
    pub fn injected_into<T: ?Sized + 'static>() -> Self {
        Self::described(
            format!("injected into {}", std::any::type_name::<T>()),
            |ctx| ctx.requesting_type().is_some_and(|t| t.is::<T>()),
        )
    }

    /// Applies when the direct requester is any of `types`.
    pub fn injected_into_any(types: &[TypeInfo]) -> Self {
        let types: Vec<TypeInfo> = types.to_vec();
        let names: Vec<&str> = types.iter().map(TypeInfo::name).collect();
        Self::described(
            format!("injected into any of [{}]", names.join(", ")),
            move |ctx| ctx.requesting_type().is_some_and(|t| types.contains(&t)),
        )
    }

    /// Applies when `T` is being built anywhere up the request chain.
    pub fn within_graph_of<T: ?Sized + 'static>() -> Self {
        Self::described(
            format!("within graph of {}", std::any::type_name::<T>()),
            |ctx| ctx.is_within::<T>(),
        )
    }

    /// Evaluates the condition.
    #[inline]
    pub fn matches(&self, context: &InjectContext<'_>) -> bool {
        (self.predicate)(context)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for BindingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BindingCondition")
            .field(&self.description)
            .finish()
    }
}
