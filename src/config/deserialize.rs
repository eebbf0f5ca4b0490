// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Turns node entries into a non-empty list of NodeConfig.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::node::{NodeConfig, NodeEntry};

pub fn deserialize_nodes<'de, D>(deserializer: D) -> Result<NonEmpty<NodeConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<NodeEntry> = Vec::deserialize(deserializer)?;
    let nodes = values
        .into_iter()
        .map(NodeEntry::into_node_config)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(nodes).ok_or_else(|| serde::de::Error::custom("at least one node is required"))
}
