//! Process-wide default container.
//!
//! The global container is explicit state: it is built on first access from
//! the builder returned by the `init` closure, and released by [`teardown`],
//! after which the next [`get_or_init`] builds a fresh one.

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::builder::ContainerBuilder;
use crate::container::Container;
use crate::error::DiResult;

static GLOBAL_CONTAINER: Lazy<RwLock<Option<Container>>> = Lazy::new(|| RwLock::new(None));

/// Returns the global container, building it with `init` if there is none.
///
/// `init` runs at most once per lifetime of the global container and must
/// not access the global container itself. If it fails, nothing is stored
/// and the next call tries again.
///
/// # Examples
///
/// ```
/// use bindery::{global, ContainerBuilder, Resolver};
/// use std::sync::Arc;
///
/// let container = global::get_or_init(|| {
///     let mut builder = ContainerBuilder::new();
///     builder.bind::<String>().to_instance(Arc::new("shared".to_string()))?;
///     Ok(builder)
/// }).unwrap();
///
/// assert_eq!(*container.resolve::<String>().unwrap(), "shared");
/// assert!(global::container().is_some());
///
/// global::teardown();
/// assert!(global::container().is_none());
/// ```
pub fn get_or_init<F>(init: F) -> DiResult<Container>
where
    F: FnOnce() -> DiResult<ContainerBuilder>,
{
    if let Some(container) = GLOBAL_CONTAINER.read().as_ref() {
        return Ok(container.clone());
    }

    let mut slot = GLOBAL_CONTAINER.write();
    if let Some(container) = slot.as_ref() {
        return Ok(container.clone());
    }
    let container = init()?.build();
    tracing::debug!(bindings = container.bindings().len(), "global container initialized");
    *slot = Some(container.clone());
    Ok(container)
}

/// The global container, if one is initialized.
pub fn container() -> Option<Container> {
    GLOBAL_CONTAINER.read().clone()
}

/// Disposes and releases the global container.
///
/// Returns false if there was none. Handles obtained earlier stay usable
/// but are no longer the global container.
pub fn teardown() -> bool {
    let taken = GLOBAL_CONTAINER.write().take();
    match taken {
        Some(container) => {
            container.dispose();
            tracing::debug!("global container torn down");
            true
        }
        None => false,
    }
}
