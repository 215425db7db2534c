//! Error types for the dependency injection container.

use thiserror::Error;

use crate::key::{ContractKey, TypeInfo};

/// Boxed error returned by user-supplied constructors, methods and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for user-supplied construction code.
///
/// `DiError`s raised by nested resolution can be propagated with `?` and come
/// out of the container unchanged; any other error is reported as
/// [`DiError::ProviderConstructionFailed`].
pub type FactoryResult<T> = Result<T, BoxError>;

/// Dependency injection errors
///
/// Every error is raised at the failing resolve call and propagates unchanged
/// through all enclosing resolutions. The only error ever swallowed is
/// `NoBindingFound` for an optional request, which becomes an absent value.
///
/// # Examples
///
/// ```rust
/// use bindery::{ContainerBuilder, DiError, Resolver};
///
/// let container = ContainerBuilder::new().build();
/// match container.resolve::<String>() {
///     Err(DiError::NoBindingFound { key, requested_by }) => {
///         assert_eq!(key.type_name(), "alloc::string::String");
///         assert!(requested_by.is_none());
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// Non-optional request with no matching binding in the container chain
    #[error("No binding found for {key}{}", requester_suffix(.requested_by))]
    NoBindingFound {
        key: ContractKey,
        requested_by: Option<TypeInfo>,
    },

    /// More than one unconditional binding matched a single-value request
    #[error("Ambiguous binding for {key}: {count} unconditional bindings match")]
    AmbiguousBinding { key: ContractKey, count: usize },

    /// Circular dependency detected (includes the chain in call order)
    #[error("Circular dependency: {}", join_chain(.chain))]
    CircularDependency { chain: Vec<ContractKey> },

    /// A constructor, method or factory reported a failure of its own
    #[error("Provider for {key} failed{}: {source}", requester_suffix(.requested_by))]
    ProviderConstructionFailed {
        key: ContractKey,
        requested_by: Option<TypeInfo>,
        #[source]
        source: BoxError,
    },

    /// A second, different single instance was declared for the same key
    #[error("Duplicate singleton instance for {key}")]
    DuplicateSingletonInstance { key: ContractKey },

    /// The identical provider was registered twice for the same key
    #[error("Binding for {key} is already registered with the same provider")]
    DuplicateBinding { key: ContractKey },

    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),

    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// Container options could not be parsed
    #[cfg(feature = "config")]
    #[error("Invalid container options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl DiError {
    /// Turns an error raised by user construction code into a `DiError`.
    ///
    /// A boxed `DiError` is unwrapped so nested resolution failures keep
    /// their original shape; everything else is wrapped with the request.
    pub(crate) fn from_factory(
        error: BoxError,
        key: &ContractKey,
        requested_by: Option<TypeInfo>,
    ) -> Self {
        match error.downcast::<DiError>() {
            Ok(di) => *di,
            Err(source) => DiError::ProviderConstructionFailed {
                key: key.clone(),
                requested_by,
                source,
            },
        }
    }

    /// The key chain for circular dependency errors.
    pub fn chain(&self) -> Option<&[ContractKey]> {
        match self {
            DiError::CircularDependency { chain } => Some(chain),
            _ => None,
        }
    }
}

fn requester_suffix(requested_by: &Option<TypeInfo>) -> String {
    match requested_by {
        Some(info) => format!(" (requested by {})", info.name()),
        None => String::new(),
    }
}

fn join_chain(chain: &[ContractKey]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
