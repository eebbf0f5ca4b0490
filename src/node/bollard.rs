// ABOUTME: Bollard-based node handle talking to one Docker Engine.
// ABOUTME: Maps engine responses onto ImageError so the cluster can classify them.

use super::sink::OutputSink;
use super::traits::{ImageError, ImageOps, PullOptions, PushOptions, RegistryAuth};
use crate::config::NodeConfig;
use crate::types::{ImageName, NodeId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::query_parameters::{CreateImageOptions, PushImageOptions, RemoveImageOptions};
use futures::StreamExt;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TAG: &str = "latest";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ImageError::InUse(format!("{}: {}", image_name, message)),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_name, e)),
    }
}

fn map_pull_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 401 || *status_code == 403 => {
            ImageError::AuthenticationFailed(message.clone())
        }
        _ => ImageError::PullFailed(format!("{}: {}", image_name, e)),
    }
}

fn map_push_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 401 || *status_code == 403 => {
            ImageError::AuthenticationFailed(message.clone())
        }
        _ => ImageError::PushFailed(format!("{}: {}", image_name, e)),
    }
}

fn credentials(auth: &RegistryAuth) -> DockerCredentials {
    DockerCredentials {
        username: Some(auth.username.clone()),
        password: Some(auth.password.clone()),
        email: auth.email.clone(),
        serveraddress: auth.server.clone(),
        ..Default::default()
    }
}

/// Build the create-image query for a pull.
///
/// Without a tag the engine pulls every tag of the repository, so a bare
/// repository is pinned to "latest". A reference that already carries a tag
/// or digest is sent as is.
fn create_image_options(opts: &PullOptions) -> CreateImageOptions {
    let from_image = opts.from_image();
    let tag = match &opts.tag {
        Some(tag) => Some(tag.clone()),
        None if has_tag_or_digest(&from_image) => None,
        None => Some(DEFAULT_TAG.to_string()),
    };
    CreateImageOptions {
        from_image: Some(from_image),
        tag,
        ..Default::default()
    }
}

/// A ':' after the last '/' is a tag; a ':' before it belongs to a registry port.
fn has_tag_or_digest(reference: &str) -> bool {
    if reference.contains('@') {
        return true;
    }
    let last_segment = reference.rsplit('/').next().unwrap_or(reference);
    last_segment.contains(':')
}

/// Forward one progress message to the sink as a JSON line.
fn forward_progress<T: Serialize>(sink: &OutputSink, message: &T) -> std::io::Result<()> {
    let line = serde_json::to_vec(message).map_err(std::io::Error::other)?;
    sink.write_line(&line)
}

// =============================================================================
// BollardNode
// =============================================================================

/// Node handle backed by a bollard Docker client.
pub struct BollardNode {
    id: NodeId,
    client: Docker,
}

impl BollardNode {
    /// Wrap an already-connected Docker client.
    pub fn new(id: NodeId, client: Docker) -> Self {
        Self { id, client }
    }

    /// Connect to the engine at the configured address.
    ///
    /// `unix://` addresses and bare paths use the unix socket transport,
    /// `tcp://` and `http://` addresses use plain HTTP.
    pub fn connect(config: &NodeConfig, timeout: Duration) -> Result<Self, ImageError> {
        // The engine client only takes whole seconds
        let timeout = timeout.as_secs().max(1);
        let address = config.address.as_str();

        let client = if let Some(path) = address.strip_prefix("unix://") {
            Docker::connect_with_unix(path, timeout, bollard::API_DEFAULT_VERSION)
        } else if address.starts_with("tcp://") || address.starts_with("http://") {
            Docker::connect_with_http(address, timeout, bollard::API_DEFAULT_VERSION)
        } else {
            Docker::connect_with_unix(address, timeout, bollard::API_DEFAULT_VERSION)
        }
        .map_err(|e| ImageError::Runtime(format!("failed to connect to {}: {}", address, e)))?;

        Ok(Self::new(config.id.clone(), client))
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }
}

#[async_trait]
impl ImageOps for BollardNode {
    async fn remove_image(&self, name: &ImageName) -> Result<(), ImageError> {
        let image_name = name.as_str();
        tracing::debug!(node = %self.id, image = image_name, "removing image");

        let opts = RemoveImageOptions {
            force: false,
            ..Default::default()
        };

        self.client
            .remove_image(image_name, Some(opts), None)
            .await
            .map_err(|e| map_remove_error(e, image_name))?;

        Ok(())
    }

    async fn pull_image(&self, opts: &PullOptions, sink: &OutputSink) -> Result<(), ImageError> {
        let image_name = opts.from_image();
        tracing::debug!(node = %self.id, image = %image_name, "pulling image");

        let create = create_image_options(opts);

        // Pull returns a stream of progress updates; forward and drain it
        let mut stream = self
            .client
            .create_image(Some(create), None, opts.auth.as_ref().map(credentials));
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| map_pull_error(e, &image_name))?;
            forward_progress(sink, &info).map_err(|e| {
                ImageError::PullFailed(format!("{}: writing progress: {}", image_name, e))
            })?;
        }

        Ok(())
    }

    async fn push_image(
        &self,
        opts: &PushOptions,
        auth: &RegistryAuth,
        sink: &OutputSink,
    ) -> Result<(), ImageError> {
        let image_name = opts.reference();
        tracing::debug!(node = %self.id, image = %image_name, "pushing image");

        let push = PushImageOptions {
            tag: opts.tag.clone(),
            ..Default::default()
        };

        let mut stream = self
            .client
            .push_image(&image_name, Some(push), Some(credentials(auth)));
        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| map_push_error(e, &image_name))?;
            forward_progress(sink, &info).map_err(|e| {
                ImageError::PushFailed(format!("{}: writing progress: {}", image_name, e))
            })?;
        }

        Ok(())
    }
}
