// ABOUTME: Node handles: one cluster member able to run image operations.
// ABOUTME: Defines the ImageOps capability and its bollard-backed implementation.

mod bollard;
mod sink;
mod traits;

pub use self::bollard::BollardNode;
pub use sink::OutputSink;
pub use traits::{ImageError, ImageErrorKind, ImageOps, PullOptions, PushOptions, RegistryAuth};
