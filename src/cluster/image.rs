// ABOUTME: Cluster-level remove, pull and push of container images.
// ABOUTME: Targets the recorded node when placement is known, broadcasts otherwise.

use super::error::{DispatchError, NodeSnafu};
use super::membership::Node;
use super::resolver::{self, Route};
use super::{Cluster, fanout};
use crate::node::{ImageErrorKind, OutputSink, PullOptions, PushOptions, RegistryAuth};
use crate::types::ImageName;
use snafu::ResultExt;

/// Failures a broadcast treats as "nothing to do on this node".
const IGNORE_MISSING: &[ImageErrorKind] = &[ImageErrorKind::NoSuchImage];

impl Cluster {
    /// Remove an image from the cluster.
    ///
    /// With a placement record only the recorded node is asked, and the record
    /// is dropped once it succeeds. A targeted failure is returned as is, with
    /// no broadcast retry. Without a record every node is asked.
    pub async fn remove_image(&self, name: &ImageName) -> Result<(), DispatchError> {
        let nodes = self.membership.snapshot();

        match resolver::resolve(self.placement.as_ref(), &nodes, name).await? {
            Route::Targeted(node) => {
                node.handle()
                    .remove_image(name)
                    .await
                    .context(NodeSnafu {
                        node: node.id().clone(),
                    })?;

                if let Err(e) = self.placement.forget(name).await {
                    tracing::warn!(image = %name, error = %e, "failed to forget placement record");
                }
                Ok(())
            }
            Route::Broadcast => {
                fanout::run_on_nodes(
                    &nodes,
                    |node: Node| async move { node.handle().remove_image(name).await },
                    IGNORE_MISSING,
                )
                .await
            }
        }
    }

    /// Pull an image on every node of the cluster.
    ///
    /// A pulled image is not on any node yet, so placement is never consulted.
    pub async fn pull_image(
        &self,
        opts: &PullOptions,
        sink: &OutputSink,
    ) -> Result<(), DispatchError> {
        let nodes = self.membership.snapshot();
        tracing::debug!(image = %opts.from_image(), nodes = nodes.len(), "broadcasting pull");

        fanout::run_on_nodes(
            &nodes,
            |node: Node| async move { node.handle().pull_image(opts, sink).await },
            IGNORE_MISSING,
        )
        .await
    }

    /// Push an image to a registry from the node holding it.
    ///
    /// Routed like [`Cluster::remove_image`], keyed by `opts.name`, but the
    /// placement record is left alone on either path.
    pub async fn push_image(
        &self,
        opts: &PushOptions,
        auth: &RegistryAuth,
        sink: &OutputSink,
    ) -> Result<(), DispatchError> {
        let nodes = self.membership.snapshot();

        match resolver::resolve(self.placement.as_ref(), &nodes, &opts.name).await? {
            Route::Targeted(node) => node
                .handle()
                .push_image(opts, auth, sink)
                .await
                .context(NodeSnafu {
                    node: node.id().clone(),
                }),
            Route::Broadcast => {
                fanout::run_on_nodes(
                    &nodes,
                    |node: Node| async move { node.handle().push_image(opts, auth, sink).await },
                    IGNORE_MISSING,
                )
                .await
            }
        }
    }
}
