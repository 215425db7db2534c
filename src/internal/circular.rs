//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::key::ContractKey;
use crate::provider::SingletonId;

pub(crate) const MAX_DEPTH: usize = 1024;

/// Stack of keys being resolved along one causal chain.
///
/// One guard is created per top-level resolve call and shared by every
/// nested resolution it triggers. It is never shared between concurrent
/// resolutions.
pub(crate) struct CycleGuard {
    stack: RefCell<SmallVec<[ContractKey; 8]>>,
    building: RefCell<SmallVec<[SingletonId; 4]>>,
    max_depth: usize,
}

/// Pops its key from the guard when dropped, on every exit path.
pub(crate) struct Frame<'g> {
    guard: &'g CycleGuard,
}

/// Marks a singleton as under construction until dropped.
pub(crate) struct BuildingFrame<'g> {
    guard: &'g CycleGuard,
}

impl CycleGuard {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: RefCell::new(SmallVec::new()),
            building: RefCell::new(SmallVec::new()),
            max_depth,
        }
    }

    /// Pushes `key`, failing if it is already on the stack.
    pub(crate) fn enter(&self, key: &ContractKey) -> DiResult<Frame<'_>> {
        let mut stack = self.stack.borrow_mut();

        // Circular detection BEFORE pushing the new key
        if stack.iter().any(|k| k == key) {
            let mut chain: Vec<ContractKey> = stack.iter().cloned().collect();
            chain.push(key.clone());
            return Err(DiError::CircularDependency { chain });
        }

        if stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(stack.len()));
        }

        stack.push(key.clone());
        Ok(Frame { guard: self })
    }

    /// Marks `id` as under construction, failing if it already is.
    ///
    /// Two keys bound to one shared singleton can form a cycle the key stack
    /// alone does not see.
    pub(crate) fn enter_singleton(&self, id: &SingletonId) -> DiResult<BuildingFrame<'_>> {
        let mut building = self.building.borrow_mut();
        if building.iter().any(|b| b == id) {
            return Err(DiError::CircularDependency {
                chain: self.chain(),
            });
        }
        building.push(id.clone());
        Ok(BuildingFrame { guard: self })
    }

    /// Keys currently on the stack, root first.
    pub(crate) fn chain(&self) -> Vec<ContractKey> {
        self.stack.borrow().iter().cloned().collect()
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

impl Default for CycleGuard {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.guard.stack.borrow_mut().pop();
    }
}

impl Drop for BuildingFrame<'_> {
    fn drop(&mut self) {
        self.guard.building.borrow_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{key_of, key_of_named};

    struct A;
    struct B;

    #[test]
    fn frames_pop_on_drop() {
        let guard = CycleGuard::default();
        {
            let _a = guard.enter(&key_of::<A>()).unwrap();
            let _b = guard.enter(&key_of::<B>()).unwrap();
            assert_eq!(guard.depth(), 2);
        }
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn repeated_key_reports_full_chain() {
        let guard = CycleGuard::default();
        let _a = guard.enter(&key_of::<A>()).unwrap();
        let _b = guard.enter(&key_of::<B>()).unwrap();

        let err = guard.enter(&key_of::<A>()).err().unwrap();
        assert_eq!(
            err.chain().unwrap(),
            &[key_of::<A>(), key_of::<B>(), key_of::<A>()]
        );
        // The failed push leaves the stack untouched.
        assert_eq!(guard.depth(), 2);
    }

    #[test]
    fn identifiers_make_distinct_keys() {
        let guard = CycleGuard::default();
        let _plain = guard.enter(&key_of::<A>()).unwrap();
        assert!(guard.enter(&key_of_named::<A>("other")).is_ok());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let guard = CycleGuard::new(1);
        let _a = guard.enter(&key_of::<A>()).unwrap();
        assert!(matches!(
            guard.enter(&key_of::<B>()),
            Err(DiError::DepthExceeded(1))
        ));
    }
}
