//! `clazz describe`: Print the reflection summary of one class.

use std::path::Path;

use clazz_engine::{ClassSummary, ManagerConfig};

use crate::output::StyledOutput;

/// Load the manifest and summarize `class`
pub fn run(manifest: &Path, config: ManagerConfig, class: &str) -> anyhow::Result<ClassSummary> {
    let (manager, _) = crate::load_manager(manifest, config)?;
    let record = manager.get(class)?;
    Ok(ClassSummary::of(&record)?)
}

pub fn execute(
    manifest: &Path,
    config: ManagerConfig,
    class: &str,
    json: bool,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    let summary = run(manifest, config, class)?;
    if json {
        out.plain(&serde_json::to_string_pretty(&summary)?);
        out.newline();
        out.flush();
        return Ok(());
    }

    out.bold(&summary.name);
    out.dim(&format!(" ({})", summary.kind));
    out.newline();

    if let Some(parent) = &summary.parent {
        out.field("extends", parent);
    }
    if !summary.ancestors.interfaces.is_empty() {
        out.field("implements", &summary.ancestors.interfaces.join(", "));
    }
    if !summary.ancestors.traits.is_empty() {
        out.field("traits", &summary.ancestors.traits.join(", "));
    }
    let mut flags = Vec::new();
    if summary.is_final {
        flags.push("final");
    }
    if !summary.instantiable {
        flags.push("not instantiable");
    }
    if summary.instance_created {
        flags.push("frozen");
    }
    if !flags.is_empty() {
        out.field("flags", &flags.join(", "));
    }

    section(out, "constants", &summary.constants);
    section(out, "statics", &summary.statics);
    section(out, "fields", &summary.fields);

    if !summary.abstract_methods.is_empty() {
        out.info("abstract");
        out.newline();
        for (name, arity) in &summary.abstract_methods {
            out.plain(&format!("  {}/{}", name, arity));
            out.newline();
        }
    }

    if !summary.methods.is_empty() {
        out.info("methods");
        out.newline();
        for method in &summary.methods {
            out.plain(&format!("  {}/{}", method.name, method.arity));
            if method.owner != summary.name {
                out.dim(&format!("  from {}", method.owner));
            }
            if method.is_abstract {
                out.error("  abstract");
            }
            out.newline();
        }
    }

    if !summary.children.is_empty() {
        out.field("children", &summary.children.join(", "));
    }
    out.flush();
    Ok(())
}

fn section(out: &mut StyledOutput, title: &str, values: &clazz_engine::ValueMap) {
    if values.is_empty() {
        return;
    }
    out.info(title);
    out.newline();
    for (name, value) in values {
        out.plain(&format!("  {} = {}", name, value.to_json()));
        out.newline();
    }
}
