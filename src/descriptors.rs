//! Binding descriptors for introspection and diagnostics.

use crate::key::{ContractKey, TypeInfo};

/// How a binding produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Returns a pre-existing value.
    Instance,
    /// Builds a concrete type through constructor injection.
    Constructor,
    /// Calls a user-supplied function.
    Method,
    /// Asks a factory object to create the value.
    Factory,
    /// Projects a value out of another resolved value.
    Getter,
    /// Resolves another key and hands out its value.
    Resolve,
    /// Builds the value inside a private sub-container.
    Facade,
}

/// Binding descriptor for introspection and diagnostics
///
/// Snapshot of one declared binding, as returned by
/// [`Container::bindings`](crate::Container::bindings).
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, ProviderKind};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.bind::<u32>().to_instance(Arc::new(8080)).unwrap();
/// builder.bind::<String>().with_id("greeting")
///     .to_single_method(|_| Ok(Arc::new("hello".to_string())))
///     .unwrap();
///
/// let container = builder.build();
/// let bindings = container.bindings();
///
/// let port = bindings.iter().find(|d| d.type_name() == "u32").unwrap();
/// assert_eq!(port.kind, ProviderKind::Instance);
/// assert!(!port.singleton);
///
/// let greeting = bindings.iter().find(|d| d.identifier() == Some("greeting")).unwrap();
/// assert_eq!(greeting.kind, ProviderKind::Method);
/// assert!(greeting.singleton);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The contract key the binding answers
    pub key: ContractKey,
    /// How the value is produced
    pub kind: ProviderKind,
    /// Whether the first value is cached per container
    pub singleton: bool,
    /// Type actually built or looked up, when the provider knows it
    pub concrete: Option<TypeInfo>,
    /// Number of conditions attached to the binding
    pub conditions: usize,
}

impl BindingDescriptor {
    /// The contract type name.
    pub fn type_name(&self) -> &'static str {
        self.key.type_name()
    }

    /// The contract identifier, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.key.identifier()
    }

    pub fn is_conditional(&self) -> bool {
        self.conditions > 0
    }
}
