//! Per-container singleton cache.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::DiResult;
use crate::internal::{CycleGuard, Map};
use crate::key::TypeInfo;

use super::AnyArc;

/// Identity of a singleton within one container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SingletonId {
    /// Shared by every binding to the same concrete type and concrete id.
    Concrete {
        concrete: TypeInfo,
        identifier: Option<Arc<str>>,
    },
    /// Private to one provider (unnamed single methods, factories, facades).
    Provider(u64),
}

#[derive(Default)]
struct SingletonSlot {
    value: OnceCell<AnyArc>,
    /// Serializes construction only; readers never take it.
    build: Mutex<()>,
}

/// Lazily filled singleton instances of one container.
///
/// The map itself is only locked long enough to find or create a slot. The
/// construction of a value is serialized by the slot's build lock, so
/// unrelated singletons can be built concurrently while racers on the same
/// singleton wait for the first one and then share its value. Built values
/// are read without taking the build lock.
#[derive(Default)]
pub(crate) struct SingletonCache {
    slots: Mutex<Map<SingletonId, Arc<SingletonSlot>>>,
}

impl SingletonCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &SingletonId) -> Arc<SingletonSlot> {
        let mut slots = self.slots.lock();
        slots.entry(id.clone()).or_default().clone()
    }

    /// Returns the cached value for `id`, building it with `init` first if
    /// needed. A failed `init` leaves the slot empty so a later call retries.
    pub(crate) fn get_or_try_init<F>(
        &self,
        id: &SingletonId,
        guard: &CycleGuard,
        init: F,
    ) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let slot = self.slot(id);
        if let Some(existing) = slot.value.get() {
            return Ok(existing.clone());
        }

        // Re-entering a singleton on the same chain would deadlock on its lock.
        let _building = guard.enter_singleton(id)?;

        let _build = slot.build.lock();
        if let Some(existing) = slot.value.get() {
            return Ok(existing.clone());
        }
        let built = init()?;
        Ok(slot.value.get_or_init(|| built).clone())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: &SingletonId) -> Option<AnyArc> {
        let slots = self.slots.lock();
        slots.get(id).and_then(|slot| slot.value.get().cloned())
    }

    /// Number of singletons built so far.
    ///
    /// Never waits on a construction in progress, so it may be called from
    /// inside one.
    pub(crate) fn len(&self) -> usize {
        let slots = self.slots.lock();
        slots.values().filter(|slot| slot.value.get().is_some()).count()
    }

    /// Drops every cached value. Called on container teardown.
    pub(crate) fn clear(&self) {
        let drained: Vec<_> = {
            let mut slots = self.slots.lock();
            slots.drain().map(|(_, slot)| slot).collect()
        };
        // Drop values outside the map lock.
        drop(drained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use crate::key::key_of;
    use crate::provider::erase;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn concrete<T: 'static>() -> SingletonId {
        SingletonId::Concrete {
            concrete: TypeInfo::of::<T>(),
            identifier: None,
        }
    }

    #[test]
    fn builds_once_and_caches() {
        let cache = SingletonCache::new();
        let guard = CycleGuard::new(16);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_try_init(&concrete::<u32>(), &guard, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(erase(Arc::new(1u32)))
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&concrete::<u32>()).is_some());
    }

    #[test]
    fn failed_init_is_not_cached() {
        let cache = SingletonCache::new();
        let guard = CycleGuard::new(16);
        let id = SingletonId::Provider(7);

        let first = cache.get_or_try_init(&id, &guard, || Err(DiError::DepthExceeded(0)));
        assert!(first.is_err());
        assert_eq!(cache.len(), 0);

        let second = cache.get_or_try_init(&id, &guard, || Ok(erase(Arc::new("ok"))));
        assert!(second.is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reentry_on_same_chain_is_circular() {
        let cache = SingletonCache::new();
        let guard = CycleGuard::new(16);
        let _frame = guard.enter(&key_of::<u64>()).unwrap();
        let id = concrete::<u64>();

        let result = cache.get_or_try_init(&id, &guard, || {
            cache.get_or_try_init(&id, &guard, || Ok(erase(Arc::new(1u64))))
        });

        match result {
            Err(DiError::CircularDependency { chain }) => assert_eq!(chain, vec![key_of::<u64>()]),
            other => panic!("expected CircularDependency, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn len_does_not_wait_on_a_build_in_progress() {
        let cache = SingletonCache::new();
        let guard = CycleGuard::new(16);
        cache
            .get_or_try_init(&concrete::<u8>(), &guard, || Ok(erase(Arc::new(1u8))))
            .unwrap();

        let seen = cache
            .get_or_try_init(&concrete::<u16>(), &guard, || {
                assert_eq!(cache.len(), 1);
                Ok(erase(Arc::new(2u16)))
            })
            .map(|_| cache.len())
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = SingletonCache::new();
        let guard = CycleGuard::new(16);
        cache
            .get_or_try_init(&concrete::<u8>(), &guard, || Ok(erase(Arc::new(1u8))))
            .unwrap();
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.get(&concrete::<u8>()).is_none());
    }
}
