//! # bindery
//!
//! Contract-based dependency injection with conditional bindings, nested
//! facade containers and lazily built singletons.
//!
//! ## Features
//!
//! - **Contracts**: bind concrete types or trait objects, optionally under a string identifier
//! - **Providers**: instances, constructors, methods, factories, getters and recursive resolves
//! - **Conditional bindings**: pick a binding by who is asking for it
//! - **Facades**: private child containers that fall back to their parent
//! - **Circular dependency detection**: errors carry the full key chain
//! - **Thread-safe singletons**: built at most once per container, with per-singleton locks
//!
//! ## Quick Start
//!
//! ```rust
//! use bindery::{implements, ContainerBuilder, FactoryResult, Injectable, Resolver, ResolverContext};
//! use std::sync::Arc;
//!
//! trait Storage: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! struct MemoryStorage;
//! impl Storage for MemoryStorage {
//!     fn name(&self) -> &str { "memory" }
//! }
//! implements!(MemoryStorage => dyn Storage);
//!
//! impl Injectable for MemoryStorage {
//!     fn construct(_: &ResolverContext<'_>) -> FactoryResult<Self> {
//!         Ok(MemoryStorage)
//!     }
//! }
//!
//! struct Inventory {
//!     storage: Arc<dyn Storage>,
//! }
//!
//! impl Injectable for Inventory {
//!     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
//!         Ok(Self { storage: ctx.resolve()? })
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.bind::<dyn Storage>().to_single::<MemoryStorage>().unwrap();
//! builder.bind::<Inventory>().to_transient::<Inventory>().unwrap();
//!
//! let container = builder.build();
//! let inventory = container.resolve::<Inventory>().unwrap();
//! assert_eq!(inventory.storage.name(), "memory");
//! ```
//!
//! ## Conditional Bindings
//!
//! ```rust
//! use bindery::{ContainerBuilder, FactoryResult, Injectable, Resolver, ResolverContext};
//! use std::sync::Arc;
//!
//! struct Player { speed: Arc<f32> }
//! struct Enemy { speed: Arc<f32> }
//!
//! impl Injectable for Player {
//!     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
//!         Ok(Self { speed: ctx.resolve()? })
//!     }
//! }
//!
//! impl Injectable for Enemy {
//!     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
//!         Ok(Self { speed: ctx.resolve()? })
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.bind::<f32>().to_instance(Arc::new(1.0)).unwrap();
//! builder.bind::<f32>().when_injected_into::<Player>().to_instance(Arc::new(2.5)).unwrap();
//! builder.bind::<Player>().to_transient::<Player>().unwrap();
//! builder.bind::<Enemy>().to_transient::<Enemy>().unwrap();
//!
//! let container = builder.build();
//! assert_eq!(*container.resolve::<Player>().unwrap().speed, 2.5);
//! assert_eq!(*container.resolve::<Enemy>().unwrap().speed, 1.0);
//! ```
//!
//! ## Facades
//!
//! ```rust
//! use bindery::{ContainerBuilder, FactoryResult, Injectable, Resolver, ResolverContext};
//! use std::sync::Arc;
//!
//! struct Mixer { channels: Arc<u8> }
//!
//! impl Injectable for Mixer {
//!     fn construct(ctx: &ResolverContext<'_>) -> FactoryResult<Self> {
//!         Ok(Self { channels: ctx.resolve()? })
//!     }
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.bind::<Mixer>().to_single_facade_method::<Mixer, _>(|child| {
//!     child.bind::<u8>().to_instance(Arc::new(8))
//! }).unwrap();
//!
//! let container = builder.build();
//! assert_eq!(*container.resolve::<Mixer>().unwrap().channels, 8);
//! // The facade's bindings stay private.
//! assert!(container.try_resolve::<u8>().unwrap().is_none());
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod container;
pub mod context;
pub mod descriptors;
pub mod error;
pub mod global;
pub mod key;
pub mod observer;
pub mod traits;

mod internal;
mod provider;
mod registry;

pub use builder::{Binder, ContainerBuilder, Installer};
pub use condition::BindingCondition;
pub use config::ContainerOptions;
pub use container::{Container, ResolverContext};
pub use context::InjectContext;
pub use descriptors::{BindingDescriptor, ProviderKind};
pub use error::{BoxError, DiError, DiResult, FactoryResult};
pub use key::{key_of, key_of_named, ContractKey, TypeInfo};
pub use observer::{DiObserver, TracingObserver};
pub use provider::AnyArc;
pub use traits::{Dispose, Factory, Implements, Injectable, Resolver, ResolverCore};
