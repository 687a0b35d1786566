//! `clazz new`: Instantiate a class and optionally call a method.

use std::path::Path;

use anyhow::{bail, Context};
use clazz_engine::{ManagerConfig, Value, ValueMap};

use crate::manifest::decode_value;
use crate::output::StyledOutput;

/// Fields of the new instance and the result of the requested call
#[derive(Debug, Clone, PartialEq)]
pub struct NewOutcome {
    /// Class name
    pub class: String,
    /// Instance fields after construction (and the call, if any)
    pub fields: ValueMap,
    /// Return value of `--call`
    pub result: Option<Value>,
}

/// Parse `--args` as a JSON array of constructor arguments
pub fn parse_args(args: Option<&str>) -> anyhow::Result<Vec<Value>> {
    let Some(args) = args else {
        return Ok(Vec::new());
    };
    let json: serde_json::Value = serde_json::from_str(args).context("parsing --args")?;
    let serde_json::Value::Array(items) = json else {
        bail!("--args must be a JSON array");
    };
    items
        .iter()
        .map(|item| decode_value(item).map_err(|reason| anyhow::anyhow!(reason)))
        .collect()
}

pub fn run(
    manifest: &Path,
    config: ManagerConfig,
    class: &str,
    args: Option<&str>,
    call: Option<&str>,
) -> anyhow::Result<NewOutcome> {
    let args = parse_args(args)?;
    let (manager, _) = crate::load_manager(manifest, config)?;
    let instance = manager.get(class)?.create_instance(&args)?;
    let result = match call {
        Some(method) => Some(instance.call(method, &[])?),
        None => None,
    };
    Ok(NewOutcome {
        class: instance.class_name().to_string(),
        fields: instance.fields(),
        result,
    })
}

pub fn execute(
    manifest: &Path,
    config: ManagerConfig,
    class: &str,
    args: Option<&str>,
    call: Option<&str>,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    let outcome = run(manifest, config, class, args, call)?;

    out.success("created ");
    out.bold(&outcome.class);
    out.newline();
    for (name, value) in &outcome.fields {
        out.field(name, &value.to_json().to_string());
    }
    if let (Some(method), Some(result)) = (call, &outcome.result) {
        out.info(&format!("{}()", method));
        out.plain(&format!(" => {}", result.to_json()));
        out.newline();
    }
    out.flush();
    Ok(())
}
