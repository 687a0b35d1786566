//! Options recognized by every kind: `$_extends`, `$_requires`, `$_constants`

use crate::definition::{ResolvedDefinition, CONSTANTS_KEY, EXTENDS_KEY, REQUIRES_KEY};
use crate::error::ClazzResult;
use crate::kind::{MetaOption, OptionContext};
use crate::value::Value;

/// `$_extends`: parent class name or null
pub fn extends_option() -> MetaOption {
    MetaOption::new(EXTENDS_KEY, validate_extends, apply_extends)
        .with_default(|| Value::Null)
        .with_related(related_extends)
}

fn validate_extends(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::String(name) if !name.is_empty() => {
            ctx.record.check_parent(ctx.manager, name).map(|_| ())
        }
        other => Err(ctx.invalid(format!(
            "expected a class name or null, got {}",
            other.type_name()
        ))),
    }
}

fn apply_extends(
    ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    resolved.parent = match value.as_str() {
        Some(name) => {
            let parent = ctx.manager.get(name)?;
            parent.constructor()?;
            Some(parent)
        }
        None => None,
    };
    Ok(())
}

fn related_extends(value: &Value) -> Vec<String> {
    value
        .as_str()
        .filter(|name| !name.is_empty())
        .map(|name| vec![name.to_string()])
        .unwrap_or_default()
}

/// `$_requires`: class names, or an alias → class name map
pub fn requires_option() -> MetaOption {
    MetaOption::new(REQUIRES_KEY, validate_requires, apply_requires).with_related(related_requires)
}

fn validate_requires(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    let names: Vec<&Value> = match value {
        Value::Null => return Ok(()),
        Value::Array(items) => items.iter().collect(),
        Value::Map(aliases) => aliases.values().collect(),
        other => {
            return Err(ctx.invalid(format!(
                "expected an array or a map of class names, got {}",
                other.type_name()
            )))
        }
    };
    for name in names {
        match name.as_str() {
            Some(n) if !n.is_empty() => {}
            _ => return Err(ctx.invalid("every required class must be a non-empty name")),
        }
    }
    Ok(())
}

fn apply_requires(
    ctx: &OptionContext<'_>,
    _value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    for (alias, name) in ctx.definition.requires() {
        ctx.manager.get(&name)?;
        resolved.requires.push((alias, name));
    }
    Ok(())
}

fn related_requires(value: &Value) -> Vec<String> {
    let names: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Map(aliases) => aliases.values().collect(),
        _ => Vec::new(),
    };
    names
        .into_iter()
        .filter_map(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `$_constants`: map of non-function values
pub fn constants_option() -> MetaOption {
    MetaOption::new(CONSTANTS_KEY, validate_constants, apply_constants)
}

fn validate_constants(ctx: &OptionContext<'_>, value: &Value) -> ClazzResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Map(constants) => match constants.iter().find(|(_, v)| v.is_function()) {
            Some((name, _)) => Err(ctx.invalid(format!("constant \"{}\" is a function", name))),
            None => Ok(()),
        },
        other => Err(ctx.invalid(format!("expected a map, got {}", other.type_name()))),
    }
}

fn apply_constants(
    _ctx: &OptionContext<'_>,
    value: &Value,
    resolved: &mut ResolvedDefinition,
) -> ClazzResult<()> {
    resolved.constants = value.as_map().cloned().unwrap_or_default();
    Ok(())
}
