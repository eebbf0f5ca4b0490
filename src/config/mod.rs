// ABOUTME: Configuration types and parsing for armada.yml.
// ABOUTME: Lists cluster nodes, placement tracking and the engine timeout.

mod deserialize;
mod init;
mod node;

pub use init::init_config;
pub use node::NodeConfig;

use crate::error::{Error, Result};
use deserialize::deserialize_nodes;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "armada.yml";
pub const CONFIG_FILENAME_ALT: &str = "armada.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".armada/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_nodes")]
    pub nodes: NonEmpty<NodeConfig>,

    #[serde(default)]
    pub placement: PlacementConfig,

    /// Timeout applied by each node's engine client.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacementConfig {
    #[serde(default = "default_tracking")]
    pub tracking: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            tracking: default_tracking(),
        }
    }
}

fn default_tracking() -> bool {
    true
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.timeout < Duration::from_secs(1) {
            return Err(Error::InvalidConfig(format!(
                "timeout must be at least 1s, got {:?}",
                self.timeout
            )));
        }

        let mut seen = HashSet::new();
        for node in self.nodes.iter() {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate node id: {}", node.id)));
            }
        }
        Ok(())
    }
}
