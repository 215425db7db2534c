//! Facade provider: a private sub-container created on first use.

use once_cell::sync::OnceCell;

use crate::builder::{ContainerBuilder, Installer};
use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::key::TypeInfo;
use crate::Container;

use super::{AnyArc, Ctor};

/// Builds its concrete type inside a child container of the declaring one.
///
/// The child is created and installed on the first `provide` call and reused
/// afterwards; it lives exactly as long as this provider.
pub(crate) struct FacadeProvider {
    concrete: TypeInfo,
    installer: Box<dyn Installer + Send + Sync>,
    build: Ctor,
    child: OnceCell<Container>,
}

impl FacadeProvider {
    pub(crate) fn new(
        concrete: TypeInfo,
        installer: Box<dyn Installer + Send + Sync>,
        build: Ctor,
    ) -> Self {
        Self {
            concrete,
            installer,
            build,
            child: OnceCell::new(),
        }
    }

    pub(crate) fn concrete(&self) -> TypeInfo {
        self.concrete
    }

    pub(crate) fn provide(&self, ctx: &ResolverContext<'_>) -> DiResult<AnyArc> {
        let child = self.child.get_or_try_init(|| {
            let mut builder = ContainerBuilder::child_of(ctx.container(), self.concrete);
            self.installer.install(&mut builder)?;
            let child = builder.build();
            tracing::debug!(
                facade = self.concrete.name(),
                bindings = child.bindings().len(),
                "facade container created"
            );
            Ok::<_, crate::DiError>(child)
        })?;

        let inner = ctx.for_container(child).for_requester(self.concrete);
        (self.build)(&inner)
    }
}
