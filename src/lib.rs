// ABOUTME: Library root for armada - cluster-wide image operation dispatch.
// ABOUTME: The CLI binary is in main.rs.

pub mod cluster;
pub mod config;
pub mod error;
pub mod node;
pub mod output;
pub mod placement;
pub mod types;
