// ABOUTME: In-memory placement store keyed by image name.
// ABOUTME: Holds at most one node per image behind a parking_lot RwLock.

use super::{Placement, PlacementError, PlacementStore};
use crate::types::{ImageName, NodeId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Placement store that keeps records in process memory.
#[derive(Debug, Default)]
pub struct MemoryPlacement {
    records: RwLock<HashMap<ImageName, NodeId>>,
}

impl MemoryPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl PlacementStore for MemoryPlacement {
    async fn lookup(&self, image: &ImageName) -> Result<Placement, PlacementError> {
        Ok(match self.records.read().get(image) {
            Some(node) => Placement::Node(node.clone()),
            None => Placement::NotRecorded,
        })
    }

    async fn record(&self, image: &ImageName, node: &NodeId) -> Result<(), PlacementError> {
        self.records.write().insert(image.clone(), node.clone());
        Ok(())
    }

    async fn forget(&self, image: &ImageName) -> Result<(), PlacementError> {
        self.records.write().remove(image);
        Ok(())
    }
}
