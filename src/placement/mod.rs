// ABOUTME: Placement tracking: which node holds which image.
// ABOUTME: Pluggable store with an in-memory and a disabled implementation.

mod disabled;
mod memory;

pub use disabled::DisabledPlacement;
pub use memory::MemoryPlacement;

use crate::types::{ImageName, NodeId};
use async_trait::async_trait;

/// Result of a placement lookup.
///
/// `TrackingDisabled` and `NotRecorded` are different answers: the first means
/// the store never knows, the second means it knows of no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The image was last recorded on this node.
    Node(NodeId),
    /// Tracking is on but there is no record for the image.
    NotRecorded,
    /// The store does not track placement at all.
    TrackingDisabled,
}

/// Image-to-node bookkeeping.
///
/// A record is a hint, not proof that the image is still on the node.
/// Implementations must be safe to call from concurrent dispatches.
#[async_trait]
pub trait PlacementStore: Send + Sync {
    /// Look up the node recorded for an image.
    async fn lookup(&self, image: &ImageName) -> Result<Placement, PlacementError>;

    /// Record (or replace) the node holding an image.
    async fn record(&self, image: &ImageName, node: &NodeId) -> Result<(), PlacementError>;

    /// Drop the record for an image. Forgetting an unknown image is not an error.
    async fn forget(&self, image: &ImageName) -> Result<(), PlacementError>;
}

/// Errors from placement storage.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("placement storage unavailable: {0}")]
    Unavailable(String),

    #[error("placement storage error: {0}")]
    Backend(String),
}
