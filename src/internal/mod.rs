//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod dispose_bag;

pub(crate) use circular::CycleGuard;
pub(crate) use dispose_bag::DisposeBag;

#[cfg(feature = "performance")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "performance"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;
