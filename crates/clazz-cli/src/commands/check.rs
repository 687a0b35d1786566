//! `clazz check`: Register and synthesize every class of a manifest.

use std::path::Path;

use clazz_engine::{ClassManager, ManagerConfig};

use crate::manifest::ClassManifest;
use crate::output::StyledOutput;

/// Result of checking one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Class name
    pub name: String,
    /// Declared kind
    pub kind: String,
    /// Registration or synthesis error
    pub error: Option<String>,
}

impl CheckOutcome {
    /// Whether the class registered and synthesized
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Register all declarations, then synthesize each registered one.
///
/// Registration happens first so that classes may reference ones declared
/// later in the manifest.
pub fn run(manifest: &ClassManifest, config: ManagerConfig) -> Vec<CheckOutcome> {
    let manager = ClassManager::with_config(config);
    let mut outcomes: Vec<CheckOutcome> = manifest
        .classes
        .iter()
        .map(|entry| CheckOutcome {
            name: entry.name.clone(),
            kind: entry.kind.clone(),
            error: entry.register(&manager).err().map(|e| e.to_string()),
        })
        .collect();

    for outcome in outcomes.iter_mut().filter(|o| o.error.is_none()) {
        let result = manager
            .get(&outcome.name)
            .and_then(|record| record.constructor().map(|_| ()));
        if let Err(e) = result {
            tracing::debug!(class = %outcome.name, error = %e, "synthesis failed");
            outcome.error = Some(e.to_string());
        }
    }
    outcomes
}

/// Print one line per class; returns whether every class passed
pub fn execute(
    manifest: &Path,
    config: ManagerConfig,
    out: &mut StyledOutput,
) -> anyhow::Result<bool> {
    let parsed = ClassManifest::from_file(manifest)?;
    let outcomes = run(&parsed, config);

    for outcome in &outcomes {
        if outcome.passed() {
            out.pass_badge();
        } else {
            out.fail_badge();
        }
        out.plain(" ");
        out.bold(&outcome.name);
        out.dim(&format!(" ({})", outcome.kind));
        if let Some(error) = &outcome.error {
            out.plain("\n       ");
            out.error(error);
        }
        out.newline();
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    out.newline();
    if failed == 0 {
        out.success(&format!("{} classes ok", outcomes.len()));
    } else {
        out.error(&format!("{} of {} classes failed", failed, outcomes.len()));
    }
    out.newline();
    out.flush();
    Ok(failed == 0)
}
