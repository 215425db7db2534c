//! Installers: reusable groups of bindings.

use crate::error::DiResult;

use super::ContainerBuilder;

/// Declares a group of bindings on a [`ContainerBuilder`].
///
/// Installers organize declarations into reusable units and populate the
/// private container of a facade binding. Closures taking
/// `&mut ContainerBuilder` implement it too.
///
/// # Example
///
/// ```rust
/// use bindery::{ContainerBuilder, DiResult, Installer, Resolver};
/// use std::sync::Arc;
///
/// struct Settings { volume: u8 }
///
/// struct AudioInstaller;
///
/// impl Installer for AudioInstaller {
///     fn install(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
///         builder.bind::<Settings>().to_instance(Arc::new(Settings { volume: 7 }))
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut builder = ContainerBuilder::new();
/// builder.install(&AudioInstaller)?;
/// builder.install(&|b: &mut ContainerBuilder| b.bind::<u32>().to_instance(Arc::new(44_100)))?;
///
/// let container = builder.build();
/// assert_eq!(container.resolve::<Settings>()?.volume, 7);
/// assert_eq!(*container.resolve::<u32>()?, 44_100);
/// # Ok(())
/// # }
/// ```
pub trait Installer {
    /// Registers this installer's bindings.
    fn install(&self, builder: &mut ContainerBuilder) -> DiResult<()>;
}

impl<F> Installer for F
where
    F: Fn(&mut ContainerBuilder) -> DiResult<()>,
{
    fn install(&self, builder: &mut ContainerBuilder) -> DiResult<()> {
        self(builder)
    }
}
