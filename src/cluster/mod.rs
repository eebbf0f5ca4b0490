// ABOUTME: Cluster façade dispatching image operations to nodes.
// ABOUTME: Combines placement lookup, targeted dispatch and broadcast fan-out.

mod error;
mod fanout;
mod image;
mod membership;
mod resolver;

pub use error::{DispatchError, DispatchErrorKind};
pub use fanout::run_on_nodes;
pub use membership::{Membership, Node};
pub use resolver::Route;

use crate::node::{ImageError, ImageErrorKind};
use crate::placement::PlacementStore;
use crate::types::{ImageName, NodeId};
use std::future::Future;
use std::sync::Arc;

/// Dispatches image operations across the nodes of a cluster.
///
/// Neither the membership nor the placement store is owned here; both are
/// shared with whoever maintains them.
pub struct Cluster {
    membership: Arc<Membership>,
    placement: Arc<dyn PlacementStore>,
}

impl Cluster {
    pub fn new(membership: Arc<Membership>, placement: Arc<dyn PlacementStore>) -> Self {
        Self {
            membership,
            placement,
        }
    }

    pub fn membership(&self) -> &Arc<Membership> {
        &self.membership
    }

    pub fn placement(&self) -> &Arc<dyn PlacementStore> {
        &self.placement
    }

    /// Ids of the current members, in registration order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.membership
            .snapshot()
            .iter()
            .map(|node| node.id().clone())
            .collect()
    }

    /// Decide where an operation on `image` should run.
    pub async fn resolve_node(&self, image: &ImageName) -> Result<Route, DispatchError> {
        let nodes = self.membership.snapshot();
        resolver::resolve(self.placement.as_ref(), &nodes, image).await
    }

    /// Run `op` on every current member, ignoring failures of the given kinds.
    pub async fn run_on_nodes<T, F, Fut>(
        &self,
        op: F,
        ignorable: &[ImageErrorKind],
    ) -> Result<T, DispatchError>
    where
        F: Fn(Node) -> Fut,
        Fut: Future<Output = Result<T, ImageError>>,
    {
        let nodes = self.membership.snapshot();
        fanout::run_on_nodes(&nodes, op, ignorable).await
    }
}
