//! Interface kind and the `$_implements` extension

use crate::constructor::CONSTRUCTOR_KEY;
use crate::definition::{ResolvedDefinition, IMPLEMENTS_KEY};
use crate::error::{ClazzError, ClazzResult};
use crate::kind::{BodyRule, ClassKind, MetaOption, OptionContext};
use crate::value::Value;

use super::common::{constants_option, extends_option, requires_option};
use super::INTERFACE;

pub(super) fn kind() -> ClassKind {
    ClassKind::new(INTERFACE)
        .with_parent_kind(INTERFACE)
        .with_body_rule(BodyRule::SignaturesOnly)
        .carrying_abstract()
        .with_option(extends_option())
        .with_option(requires_option())
        .with_option(constants_option())
        .with_option(MetaOption::forbidden(CONSTRUCTOR_KEY))
}

/// `$_implements`: interface names whose obligations the record takes on
pub fn implements_option() -> MetaOption {
    MetaOption::new(IMPLEMENTS_KEY, validate_implements, apply_implements)
        .with_related(related_names)
}

pub(super) fn related_names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Names of a `$_implements`/`$_traits` list, or `InvalidClassOption`
pub(super) fn name_list<'v>(ctx: &OptionContext<'_>, value: &'v Value) -> ClazzResult<Vec<&'v str>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(ctx.invalid(format!(
                "expected an array of class names, got {}",
                other.type_name()
            )))
        }
    };
    items
        .iter()
        .map(|item| match item.as_str() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(ctx.invalid("every entry must be a non-empty class name")),
        })
        .collect()
}

fn validate_implements(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    for name in name_list(ctx, value)? {
        if name == ctx.class_name() {
            return Err(ClazzError::InheritanceCycle {
                class: name.to_string(),
            });
        }
        let interface = ctx.manager.get(name)?;
        if interface.kind().name() != INTERFACE {
            return Err(ClazzError::NotAnInterface {
                class: ctx.class_name().to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn apply_implements(
    ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    for name in name_list(ctx, value)? {
        let interface = ctx.manager.get(name)?;
        interface.constructor()?;
        if !resolved.interfaces.iter().any(|i| i.name() == name) {
            resolved.interfaces.push(interface);
        }
    }
    Ok(())
}
