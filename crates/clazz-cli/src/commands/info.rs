//! `clazz info`: Display version, registered kinds and environment.

use clazz_engine::{Capability, KindRegistry, ManagerConfig};

use crate::output::StyledOutput;

const CAPABILITIES: [Capability; 7] = [
    Capability::Instantiate,
    Capability::Constructor,
    Capability::Final,
    Capability::Static,
    Capability::Abstract,
    Capability::Interfaces,
    Capability::Traits,
];

/// One line per kind: name, allowed parents and capabilities
pub fn kind_lines(kinds: &KindRegistry) -> Vec<(String, String)> {
    kinds
        .names()
        .iter()
        .filter_map(|name| kinds.get(name).ok())
        .map(|kind| {
            let caps: Vec<&str> = CAPABILITIES
                .iter()
                .filter(|cap| kind.supports(**cap))
                .map(|cap| cap.as_str())
                .collect();
            let parents = match kind.parent_kinds() {
                [] => "-".to_string(),
                parents => parents.join("|"),
            };
            (
                kind.name().to_string(),
                format!("extends {}; {}", parents, caps.join(", ")),
            )
        })
        .collect()
}

pub fn execute(config: &ManagerConfig, out: &mut StyledOutput) -> anyhow::Result<()> {
    out.bold(&format!("Clazz v{}", clazz_engine::VERSION));
    out.newline();
    out.newline();

    out.info("Kinds");
    out.newline();
    for (name, description) in kind_lines(&KindRegistry::standard()) {
        out.field(&format!("  {}", name), &description);
    }
    out.newline();

    out.info("Config");
    out.newline();
    out.plain(&config.to_toml()?);
    out.newline();

    out.info("Environment");
    out.newline();
    for var in ["CLAZZ_LOG", "NO_COLOR"] {
        let value = std::env::var(var).unwrap_or_else(|_| "(default)".to_string());
        out.field(&format!("  {}", var), &value);
    }
    out.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_kinds_listed() {
        let lines = kind_lines(&KindRegistry::standard());
        let names: Vec<&str> = lines.iter().map(|(name, _)| name.as_str()).collect();
        assert!(names.contains(&"Class"));
        assert!(names.contains(&"Interface"));

        let (_, class) = lines.iter().find(|(name, _)| name == "Class").unwrap();
        assert!(class.contains("instantiate"));
        assert!(class.contains("traits"));
        let (_, interface) = lines.iter().find(|(name, _)| name == "Interface").unwrap();
        assert!(!interface.contains("instantiate"));
    }
}
