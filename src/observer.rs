//! Diagnostic observers for resolution events.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::ContractKey;

/// Observer trait for dependency injection resolution events.
///
/// Observers are registered on the [`ContainerBuilder`](crate::ContainerBuilder)
/// and are called synchronously for every binding the container invokes,
/// including nested ones. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use bindery::{ContainerBuilder, ContractKey, DiObserver, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl DiObserver for Counter {
///     fn resolving(&self, _key: &ContractKey) {}
///
///     fn resolved(&self, _key: &ContractKey, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let counter = Arc::new(Counter::default());
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(counter.clone());
/// builder.bind::<u8>().to_instance(Arc::new(1)).unwrap();
///
/// let container = builder.build();
/// container.resolve::<u8>().unwrap();
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a binding's provider is invoked.
    fn resolving(&self, key: &ContractKey);

    /// Called after a provider produced its value.
    fn resolved(&self, key: &ContractKey, duration: Duration);

    /// Called when a provider, or anything it depends on, failed.
    fn failed(&self, key: &ContractKey, error: &DiError) {
        let _ = (key, error);
    }
}

/// Collection of observers shared by a container and its facade children.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn resolving(&self, key: &ContractKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &ContractKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn failed(&self, key: &ContractKey, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Observer that forwards resolution events to `tracing`.
///
/// Successful steps are emitted at `TRACE`, failures at `DEBUG`; the failure
/// itself is returned to the caller either way.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    container: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every event with `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            container: Some(name.into()),
        }
    }

    fn container(&self) -> &str {
        self.container.as_deref().unwrap_or("-")
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &ContractKey) {
        tracing::trace!(container = self.container(), %key, "resolving");
    }

    fn resolved(&self, key: &ContractKey, duration: Duration) {
        tracing::trace!(
            container = self.container(),
            %key,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &ContractKey, error: &DiError) {
        tracing::debug!(container = self.container(), %key, %error, "resolution failed");
    }
}
