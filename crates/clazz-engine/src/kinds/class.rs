//! Class kind and the options it shares with abstract classes

use crate::constructor::CONSTRUCTOR_KEY;
use crate::definition::{ResolvedDefinition, ABSTRACT_KEY, FINAL_KEY, STATIC_KEY};
use crate::error::ClazzResult;
use crate::kind::{Capability, ClassKind, MetaOption, OptionContext};
use crate::value::{Value, ValueMap};

use super::common::{constants_option, extends_option, requires_option};
use super::{ABSTRACT_CLASS, CLASS};

pub(super) fn kind() -> ClassKind {
    ClassKind::new(CLASS)
        .with_parent_kind(CLASS)
        .with_parent_kind(ABSTRACT_CLASS)
        .with_capability(Capability::Instantiate)
        .with_capability(Capability::Constructor)
        .with_capability(Capability::Final)
        .with_capability(Capability::Static)
        .with_option(extends_option())
        .with_option(requires_option())
        .with_option(constants_option())
        .with_option(final_option())
        .with_option(static_option())
        .with_option(MetaOption::forbidden(ABSTRACT_KEY))
        .with_option(constructor_option())
}

/// `$_final`
pub(super) fn final_option() -> MetaOption {
    MetaOption::new(FINAL_KEY, validate_final, apply_final).with_default(|| Value::Bool(false))
}

fn validate_final(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null | Value::Bool(_) => Ok(()),
        other => Err(ctx.invalid(format!("expected a bool, got {}", other.type_name()))),
    }
}

fn apply_final(
    _ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    resolved.is_final = value.as_bool().unwrap_or(false);
    Ok(())
}

/// `$_static`
pub(super) fn static_option() -> MetaOption {
    MetaOption::new(STATIC_KEY, validate_static, apply_static)
        .with_default(|| Value::Map(ValueMap::new()))
}

fn validate_static(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null | Value::Map(_) => Ok(()),
        other => Err(ctx.invalid(format!("expected a map, got {}", other.type_name()))),
    }
}

fn apply_static(
    _ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    if let Some(statics) = value.as_map() {
        for (name, member) in statics {
            resolved.statics.insert(name.clone(), member.clone());
        }
    }
    Ok(())
}

/// `$_constructor`
pub(super) fn constructor_option() -> MetaOption {
    MetaOption::new(CONSTRUCTOR_KEY, validate_constructor, apply_constructor)
}

fn validate_constructor(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Function(function) if !function.is_abstract() => Ok(()),
        Value::Function(_) => Err(ctx.invalid("constructor body cannot be abstract")),
        other => Err(ctx.invalid(format!(
            "expected a function, got {}",
            other.type_name()
        ))),
    }
}

fn apply_constructor(
    _ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    resolved.constructor = value.as_function().cloned();
    Ok(())
}
