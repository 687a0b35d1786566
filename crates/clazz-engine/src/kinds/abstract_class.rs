//! AbstractClass kind

use crate::definition::{ResolvedDefinition, ABSTRACT_KEY, FINAL_KEY};
use crate::error::ClazzResult;
use crate::kind::{Capability, ClassKind, MetaOption, OptionContext};
use crate::value::{Value, ValueMap};

use super::class::{constructor_option, static_option};
use super::common::{constants_option, extends_option, requires_option};
use super::ABSTRACT_CLASS;

pub(super) fn kind() -> ClassKind {
    ClassKind::new(ABSTRACT_CLASS)
        .with_parent_kind(ABSTRACT_CLASS)
        .with_capability(Capability::Constructor)
        .with_capability(Capability::Static)
        .with_capability(Capability::Abstract)
        .carrying_abstract()
        .with_option(extends_option())
        .with_option(requires_option())
        .with_option(constants_option())
        .with_option(MetaOption::new(FINAL_KEY, reject_final, apply_nothing))
        .with_option(static_option())
        .with_option(abstract_option())
        .with_option(constructor_option())
}

// Any value is rejected, false and null included.
fn reject_final(ctx: &OptionContext<'_>, _value: &Value) -> ClazzResult<()> {
    Err(ctx.invalid("abstract classes cannot be final"))
}

fn apply_nothing(
    _ctx: &OptionContext<'_>,
    _value: &Value,
    _resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    Ok(())
}

/// `$_abstract`
fn abstract_option() -> MetaOption {
    MetaOption::new(ABSTRACT_KEY, validate_abstract, apply_abstract)
        .with_default(|| Value::Map(ValueMap::new()))
}

fn validate_abstract(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Map(methods) => match methods.iter().find(|(_, v)| !v.is_function()) {
            Some((name, v)) => Err(ctx.invalid(format!(
                "abstract method \"{}\" must be a function placeholder, got {}",
                name,
                v.type_name()
            ))),
            None => Ok(()),
        },
        other => Err(ctx.invalid(format!("expected a map, got {}", other.type_name()))),
    }
}

fn apply_abstract(
    ctx: &OptionContext<'_>,
    _value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    resolved.abstract_methods = ctx.definition.abstract_methods();
    Ok(())
}
