// ABOUTME: Per-node configuration: an id and a Docker Engine address.
// ABOUTME: Parses the short forms "address" and "id=address".

use crate::types::NodeId;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub id: NodeId,
    /// `unix:///path`, a bare socket path, `tcp://host:port` or `http://host:port`.
    pub address: String,
}

impl NodeConfig {
    /// Parse `address` or `id=address`. Without an id, the address is the id.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("node address cannot be empty".to_string());
        }

        let (id, address) = match s.split_once('=') {
            Some((id, address)) => (id.trim(), address.trim()),
            None => (s, s),
        };

        if id.is_empty() {
            return Err(format!("node id cannot be empty: {}", s));
        }
        if address.is_empty() {
            return Err(format!("node address cannot be empty: {}", s));
        }

        Ok(NodeConfig {
            id: NodeId::new(id),
            address: address.to_string(),
        })
    }
}

/// Node entry as written in YAML: a string or a mapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum NodeEntry {
    Simple(String),
    Detailed {
        #[serde(default)]
        id: Option<NodeId>,
        address: String,
    },
}

impl NodeEntry {
    pub(super) fn into_node_config(self) -> Result<NodeConfig, String> {
        match self {
            NodeEntry::Simple(s) => NodeConfig::parse(&s),
            NodeEntry::Detailed { id, address } => {
                let address = address.trim();
                if address.is_empty() {
                    return Err("node address cannot be empty".to_string());
                }
                let id = match id {
                    Some(id) if id.as_str().trim().is_empty() => {
                        return Err(format!("node id cannot be empty: {}", address));
                    }
                    Some(id) => NodeId::new(id.as_str().trim()),
                    None => NodeId::new(address),
                };
                Ok(NodeConfig {
                    id,
                    address: address.to_string(),
                })
            }
        }
    }
}
