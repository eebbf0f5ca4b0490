// ABOUTME: Image operations trait implemented by every node handle.
// ABOUTME: Remove, pull and push, with errors classified by ImageErrorKind.

use super::sink::OutputSink;
use crate::types::ImageName;
use async_trait::async_trait;

/// Image operations a single node can run.
///
/// Implementations talk to exactly one already-identified node; deciding which
/// node(s) to call is the cluster's job.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Remove an image from this node.
    async fn remove_image(&self, name: &ImageName) -> Result<(), ImageError>;

    /// Pull an image from a registry onto this node, streaming progress to `sink`.
    async fn pull_image(&self, opts: &PullOptions, sink: &OutputSink) -> Result<(), ImageError>;

    /// Push an image held by this node to a registry, streaming progress to `sink`.
    async fn push_image(
        &self,
        opts: &PushOptions,
        auth: &RegistryAuth,
        sink: &OutputSink,
    ) -> Result<(), ImageError>;
}

/// Options for pulling an image.
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Repository to pull (e.g. "library/nginx").
    pub repository: String,
    /// Tag to pull. Defaults to "latest" unless the repository already names a
    /// tag or digest.
    pub tag: Option<String>,
    /// Registry host, prefixed to the repository when set.
    pub registry: Option<String>,
    /// Credentials for private registries.
    pub auth: Option<RegistryAuth>,
}

impl PullOptions {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }

    /// Repository reference including the registry host, without the tag.
    pub fn from_image(&self) -> String {
        qualify(self.registry.as_deref(), &self.repository)
    }
}

/// Options for pushing an image.
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Image to push. Also the key used for placement lookup.
    pub name: ImageName,
    /// Tag to push. All tags are pushed when unset.
    pub tag: Option<String>,
    /// Registry host, prefixed to the name when set.
    pub registry: Option<String>,
}

impl PushOptions {
    pub fn new(name: ImageName) -> Self {
        Self {
            name,
            tag: None,
            registry: None,
        }
    }

    /// Image reference including the registry host, without the tag.
    pub fn reference(&self) -> String {
        qualify(self.registry.as_deref(), self.name.as_str())
    }
}

fn qualify(registry: Option<&str>, name: &str) -> String {
    match registry {
        Some(registry) if !name.starts_with(&format!("{registry}/")) => {
            format!("{registry}/{name}")
        }
        _ => name.to_string(),
    }
}

/// Registry authentication credentials.
#[derive(Clone, Default)]
pub struct RegistryAuth {
    /// Username.
    pub username: String,
    /// Password or token.
    pub password: String,
    /// Email, still required by some older registries.
    pub email: Option<String>,
    /// Registry server (e.g., "ghcr.io").
    pub server: Option<String>,
}

impl std::fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("server", &self.server)
            .finish()
    }
}

/// Errors from image operations on a single node.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("no such image: {0}")]
    NotFound(String),

    #[error("authentication failed for registry: {0}")]
    AuthenticationFailed(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Error kind tags, used to name which failures a broadcast may ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageErrorKind {
    /// The image does not exist on the node.
    NoSuchImage,
    /// The registry rejected the credentials.
    Authentication,
    /// The image is referenced by a container.
    InUse,
    /// Connectivity, server-side and everything else.
    Transport,
}

impl ImageError {
    pub fn kind(&self) -> ImageErrorKind {
        match self {
            ImageError::NotFound(_) => ImageErrorKind::NoSuchImage,
            ImageError::AuthenticationFailed(_) => ImageErrorKind::Authentication,
            ImageError::InUse(_) => ImageErrorKind::InUse,
            ImageError::PullFailed(_) | ImageError::PushFailed(_) | ImageError::Runtime(_) => {
                ImageErrorKind::Transport
            }
        }
    }
}
