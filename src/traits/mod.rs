//! Core traits for the dependency injection container.

mod dispose;
mod factory;
mod injectable;
mod resolver;

pub use dispose::Dispose;
pub use factory::Factory;
pub use injectable::{Implements, Injectable};
pub use resolver::{Resolver, ResolverCore};
