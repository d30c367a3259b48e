//! Construction and binding of external-clause domain objects.
//!
//! [`build_external_composition`] turns raw grammar fragments into a
//! validated [`ExternalComposition`]; [`bind_external_interface`] resolves
//! the composition's argument references against the owning class's scope
//! and produces the [`BoundExternalInterface`] consumed by later stages.

mod binder;
mod builder;

pub use binder::{
    bind_external_interface, BoundArgument, BoundExternalInterface, ResolvedTarget,
    ReturnBindingPolicy, ReturnTarget,
};
pub use builder::build_external_composition;

pub use crate::ir::ast::external::ExternalComposition;
