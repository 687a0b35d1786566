//! Standard class kinds
//!
//! The four kinds are registered into a [`KindRegistryBuilder`] together
//! with the capability extensions that make `$_implements` and `$_traits`
//! available to other kinds. Extensions run once, when the table is built.

mod abstract_class;
mod class;
mod common;
mod interface;
mod trait_;

pub use common::{constants_option, extends_option, requires_option};
pub use interface::implements_option;
pub use trait_::traits_option;

use crate::kind::{Capability, KindRegistryBuilder};

/// Concrete, instantiable class
pub const CLASS: &str = "Class";
/// Class that may leave abstract methods unimplemented
pub const ABSTRACT_CLASS: &str = "AbstractClass";
/// Capability contract
pub const INTERFACE: &str = "Interface";
/// Mixin bundle
pub const TRAIT: &str = "Trait";

/// Register the four standard kinds and their extensions
pub(crate) fn register_standard(builder: KindRegistryBuilder) -> KindRegistryBuilder {
    let mut builder = builder
        .register(class::kind())
        .register(abstract_class::kind())
        .register(interface::kind())
        .register(trait_::kind());

    for target in [CLASS, ABSTRACT_CLASS, INTERFACE] {
        builder = builder.extend(target, |kind| {
            kind.add_capability(Capability::Interfaces);
            kind.add_option(implements_option());
        });
    }
    for target in [CLASS, ABSTRACT_CLASS] {
        builder = builder.extend(target, |kind| {
            kind.add_capability(Capability::Traits);
            kind.add_option(traits_option());
        });
    }
    builder
}
