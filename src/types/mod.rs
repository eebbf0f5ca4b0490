// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Node identifiers and opaque image names.

mod id;
mod image_name;

pub use id::{Id, NodeId, NodeMarker};
pub use image_name::{ImageName, ParseImageNameError};
