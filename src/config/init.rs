// ABOUTME: Config scaffolding for new clusters.
// ABOUTME: Writes an armada.yml template pointing at the local engine.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const DEFAULT_NODE: &str = "unix:///var/run/docker.sock";

/// Write `armada.yml` into `dir`, listing `nodes` (or the local engine).
pub fn init_config(dir: &Path, nodes: &[String], tracking: bool, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(nodes, tracking);

    // Round-trip through the parser so a bad --node never lands on disk
    super::Config::from_yaml(&yaml)?;
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(nodes: &[String], tracking: bool) -> String {
    let mut yaml = String::from("nodes:\n");
    if nodes.is_empty() {
        yaml.push_str(&format!("  - \"{}\"\n", DEFAULT_NODE));
    }
    for node in nodes {
        yaml.push_str(&format!("  - \"{}\"\n", node.replace('"', "\\\"")));
    }
    yaml.push_str(&format!(
        r#"placement:
  # Consult placement records before broadcasting (false: always broadcast).
  # The CLI starts each run with an empty record set.
  tracking: {}
timeout: 120s
"#,
        tracking
    ));
    yaml
}
