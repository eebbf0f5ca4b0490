// ABOUTME: Ordered cluster membership with immutable snapshots.
// ABOUTME: Dispatch works on a snapshot so concurrent changes never affect it.

use crate::node::ImageOps;
use crate::types::NodeId;
use parking_lot::RwLock;
use std::sync::Arc;

/// A cluster member: its id and the handle used to reach it.
#[derive(Clone)]
pub struct Node {
    id: NodeId,
    handle: Arc<dyn ImageOps>,
}

impl Node {
    pub fn new(id: NodeId, handle: impl ImageOps + 'static) -> Self {
        Self::from_arc(id, Arc::new(handle))
    }

    pub fn from_arc(id: NodeId, handle: Arc<dyn ImageOps>) -> Self {
        Self { id, handle }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn handle(&self) -> &dyn ImageOps {
        self.handle.as_ref()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("id", &self.id).finish()
    }
}

/// The set of nodes image operations are dispatched to.
///
/// Registration order is preserved; it is the order fan-out uses to pick
/// which result to report.
pub struct Membership {
    nodes: RwLock<Arc<[Node]>>,
}

impl Membership {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(Arc::from(Vec::new())),
        }
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let membership = Self::new();
        for node in nodes {
            membership.register(node);
        }
        membership
    }

    /// Add a node, or replace the handle of a node with the same id in place.
    pub fn register(&self, node: Node) {
        let mut guard = self.nodes.write();
        let mut nodes = guard.to_vec();
        match nodes.iter().position(|n| n.id == node.id) {
            Some(pos) => nodes[pos] = node,
            None => nodes.push(node),
        }
        *guard = Arc::from(nodes);
    }

    /// Remove a node. Returns whether it was a member.
    pub fn unregister(&self, id: &NodeId) -> bool {
        let mut guard = self.nodes.write();
        let before = guard.len();
        let nodes: Vec<Node> = guard.iter().filter(|n| &n.id != id).cloned().collect();
        let removed = nodes.len() != before;
        *guard = Arc::from(nodes);
        removed
    }

    /// The current members. Later registrations do not change a taken snapshot.
    pub fn snapshot(&self) -> Arc<[Node]> {
        self.nodes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl Default for Membership {
    fn default() -> Self {
        Self::new()
    }
}
