//! Internal disposal bag for managing cleanup hooks.

/// Disposal hooks of one container, run in LIFO order.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.hooks.push(f);
    }

    /// Takes every pending hook, most recent first.
    pub(crate) fn take_reversed(&mut self) -> Vec<Box<dyn FnOnce() + Send>> {
        let mut hooks = std::mem::take(&mut self.hooks);
        hooks.reverse();
        hooks
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn hooks_come_out_lifo() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bag = DisposeBag::default();
        for i in 0..3 {
            let log = log.clone();
            bag.push(Box::new(move || log.lock().unwrap().push(i)));
        }
        assert_eq!(bag.len(), 3);

        for hook in bag.take_reversed() {
            hook();
        }

        assert_eq!(bag.len(), 0);
        assert_eq!(*log.lock().unwrap(), vec![2, 1, 0]);
    }
}
