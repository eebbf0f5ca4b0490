// ABOUTME: Placement store used when tracking is turned off.
// ABOUTME: Every lookup answers TrackingDisabled so dispatch falls back to broadcast.

use super::{Placement, PlacementError, PlacementStore};
use crate::types::{ImageName, NodeId};
use async_trait::async_trait;

/// Store that tracks nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPlacement;

#[async_trait]
impl PlacementStore for DisabledPlacement {
    async fn lookup(&self, _image: &ImageName) -> Result<Placement, PlacementError> {
        Ok(Placement::TrackingDisabled)
    }

    async fn record(&self, _image: &ImageName, _node: &NodeId) -> Result<(), PlacementError> {
        Ok(())
    }

    async fn forget(&self, _image: &ImageName) -> Result<(), PlacementError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_are_never_visible() {
        let store = DisabledPlacement;
        let nginx = ImageName::new("nginx").unwrap();

        store.record(&nginx, &NodeId::new("n1")).await.unwrap();

        assert_eq!(
            store.lookup(&nginx).await.unwrap(),
            Placement::TrackingDisabled
        );
    }
}
