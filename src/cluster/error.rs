// ABOUTME: Dispatch error types with SNAFU pattern.
// ABOUTME: Carries the failing node and exposes a kind for programmatic handling.

use snafu::Snafu;

use crate::node::{ImageError, ImageErrorKind};
use crate::placement::PlacementError;
use crate::types::NodeId;

/// Failure of a cluster-level image operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DispatchError {
    /// A node failed and its failure was not ignorable.
    #[snafu(display("node {node}: {source}"))]
    Node { node: NodeId, source: ImageError },

    /// Every node failed, all with ignorable kinds. `source` is the first one.
    #[snafu(display("{source} (on all {nodes} node(s))"))]
    Ignored { nodes: usize, source: ImageError },

    #[snafu(display("placement lookup failed: {source}"))]
    PlacementLookup { source: PlacementError },

    #[snafu(display("placement refers to node {node}, which is not a cluster member"))]
    UnknownNode { node: NodeId },

    #[snafu(display("no nodes in the cluster"))]
    NoNodes,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchErrorKind {
    /// The image was not found where the operation ran.
    NoSuchImage,
    /// Any other node failure: auth, connectivity, server-side.
    TransportFailure,
    /// Placement tracking is on but the store failed.
    PlacementLookupFailed,
    /// Placement named a node that is not a member.
    UnknownNode,
    /// There was nowhere to run the operation.
    NoNodes,
}

impl DispatchError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DispatchErrorKind {
        match self {
            DispatchError::Node { source, .. } | DispatchError::Ignored { source, .. } => {
                match source.kind() {
                    ImageErrorKind::NoSuchImage => DispatchErrorKind::NoSuchImage,
                    _ => DispatchErrorKind::TransportFailure,
                }
            }
            DispatchError::PlacementLookup { .. } => DispatchErrorKind::PlacementLookupFailed,
            DispatchError::UnknownNode { .. } => DispatchErrorKind::UnknownNode,
            DispatchError::NoNodes => DispatchErrorKind::NoNodes,
        }
    }

    /// Whether every node failed with an ignorable kind.
    pub fn is_ignored(&self) -> bool {
        matches!(self, DispatchError::Ignored { .. })
    }

    /// The node-level error behind this failure, if any.
    pub fn image_error(&self) -> Option<&ImageError> {
        match self {
            DispatchError::Node { source, .. } | DispatchError::Ignored { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// The node whose failure is reported, if a single node is to blame.
    pub fn failed_node(&self) -> Option<&NodeId> {
        match self {
            DispatchError::Node { node, .. } => Some(node),
            DispatchError::UnknownNode { node } => Some(node),
            _ => None,
        }
    }
}

impl From<PlacementError> for DispatchError {
    fn from(source: PlacementError) -> Self {
        DispatchError::PlacementLookup { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_node_error() {
        let err = DispatchError::Ignored {
            nodes: 3,
            source: ImageError::NotFound("nginx".into()),
        };
        assert_eq!(err.kind(), DispatchErrorKind::NoSuchImage);
        assert!(err.is_ignored());
        assert!(err.to_string().contains("3 node(s)"));

        let err = DispatchError::Node {
            node: NodeId::new("n2"),
            source: ImageError::Runtime("connection refused".into()),
        };
        assert_eq!(err.kind(), DispatchErrorKind::TransportFailure);
        assert_eq!(err.failed_node(), Some(&NodeId::new("n2")));
        assert!(!err.is_ignored());
    }

    #[test]
    fn placement_errors_convert() {
        let err: DispatchError = PlacementError::Unavailable("etcd down".into()).into();
        assert_eq!(err.kind(), DispatchErrorKind::PlacementLookupFailed);
        assert!(err.image_error().is_none());
        assert!(err.to_string().contains("etcd down"));
    }
}
