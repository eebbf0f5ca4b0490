// ABOUTME: Resolves an image to a single node through the placement store.
// ABOUTME: Untracked or unrecorded images resolve to a broadcast route.

use super::error::{DispatchError, PlacementLookupSnafu};
use super::membership::Node;
use crate::placement::{Placement, PlacementStore};
use crate::types::ImageName;
use snafu::ResultExt;

/// Where an image operation should run.
#[derive(Debug, Clone)]
pub enum Route {
    /// Placement knows the node holding the image.
    Targeted(Node),
    /// Location unknown: run on every node.
    Broadcast,
}

/// Consult `store` and pick a route among `nodes`.
///
/// Store failures are returned as errors rather than turned into a broadcast,
/// so a storage outage is never mistaken for an image missing everywhere.
pub(crate) async fn resolve(
    store: &dyn PlacementStore,
    nodes: &[Node],
    image: &ImageName,
) -> Result<Route, DispatchError> {
    let placement = store.lookup(image).await.context(PlacementLookupSnafu)?;

    match placement {
        Placement::Node(id) => {
            let node = nodes
                .iter()
                .find(|node| node.id() == &id)
                .cloned()
                .ok_or(DispatchError::UnknownNode { node: id })?;
            tracing::debug!(%image, node = %node.id(), "placement found, targeting node");
            Ok(Route::Targeted(node))
        }
        Placement::NotRecorded => {
            tracing::debug!(%image, "no placement record, broadcasting");
            Ok(Route::Broadcast)
        }
        Placement::TrackingDisabled => {
            tracing::debug!(%image, "placement tracking disabled, broadcasting");
            Ok(Route::Broadcast)
        }
    }
}
