//! Contract keys for binding storage and lookup.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Runtime identity of a type, with its name kept for diagnostics.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    /// Identity of `T`. Works for trait objects as well as sized types.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The `std::any::type_name` of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this is the identity of `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Key identifying a binding target: a contract type plus an optional
/// string identifier.
///
/// Two keys are the same binding target only if both parts match. An absent
/// identifier never equals a present one, not even the empty string.
///
/// # Examples
///
/// ```rust
/// use bindery::{key_of, key_of_named, ContractKey};
///
/// trait Logger: Send + Sync {}
///
/// let plain = key_of::<dyn Logger>();
/// let named = key_of_named::<dyn Logger>("audit");
/// let empty = ContractKey::named::<dyn Logger>("");
///
/// assert_ne!(plain, named);
/// assert_ne!(plain, empty);
/// assert_eq!(named.identifier(), Some("audit"));
/// assert!(plain.type_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    contract: TypeInfo,
    identifier: Option<Arc<str>>,
}

impl ContractKey {
    /// Key for contract `C` without identifier.
    #[inline]
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            contract: TypeInfo::of::<C>(),
            identifier: None,
        }
    }

    /// Key for contract `C` disambiguated by `identifier`.
    pub fn named<C: ?Sized + 'static>(identifier: impl Into<Arc<str>>) -> Self {
        Self {
            contract: TypeInfo::of::<C>(),
            identifier: Some(identifier.into()),
        }
    }

    pub(crate) fn from_parts(contract: TypeInfo, identifier: Option<Arc<str>>) -> Self {
        Self {
            contract,
            identifier,
        }
    }

    pub fn contract(&self) -> TypeInfo {
        self.contract
    }

    pub fn type_name(&self) -> &'static str {
        self.contract.name()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "{}[{:?}]", self.contract.name(), id),
            None => f.write_str(self.contract.name()),
        }
    }
}

/// Key for contract `C` without identifier.
#[inline(always)]
pub fn key_of<C: ?Sized + 'static>() -> ContractKey {
    ContractKey::of::<C>()
}

/// Key for contract `C` with the given identifier.
pub fn key_of_named<C: ?Sized + 'static>(identifier: impl Into<Arc<str>>) -> ContractKey {
    ContractKey::named::<C>(identifier)
}
