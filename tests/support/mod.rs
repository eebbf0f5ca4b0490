// ABOUTME: Test support utilities.
// ABOUTME: Scripted in-process nodes and observable placement stores.

use armada::cluster::{Cluster, Membership, Node};
use armada::node::{ImageError, ImageOps, OutputSink, PullOptions, PushOptions, RegistryAuth};
use armada::placement::{Placement, PlacementError, PlacementStore};
use armada::types::{ImageName, NodeId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("armada=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// What a fake node answers to every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Answer {
    Ok,
    NoSuchImage,
    Transport,
    Unauthorized,
}

impl Answer {
    fn into_result(self, image: &str) -> Result<(), ImageError> {
        match self {
            Answer::Ok => Ok(()),
            Answer::NoSuchImage => Err(ImageError::NotFound(image.to_string())),
            Answer::Transport => Err(ImageError::Runtime("connection refused".to_string())),
            Answer::Unauthorized => Err(ImageError::AuthenticationFailed(image.to_string())),
        }
    }
}

/// Per-operation call counters of one fake node.
#[derive(Debug, Default)]
pub struct Calls {
    pub remove: AtomicUsize,
    pub pull: AtomicUsize,
    pub push: AtomicUsize,
}

#[allow(dead_code)]
impl Calls {
    pub fn remove(&self) -> usize {
        self.remove.load(Ordering::SeqCst)
    }

    pub fn pull(&self) -> usize {
        self.pull.load(Ordering::SeqCst)
    }

    pub fn push(&self) -> usize {
        self.push.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.remove() + self.pull() + self.push()
    }
}

/// In-process node answering every call with a fixed outcome.
pub struct FakeNode {
    answer: Answer,
    calls: Arc<Calls>,
}

#[async_trait]
impl ImageOps for FakeNode {
    async fn remove_image(&self, name: &ImageName) -> Result<(), ImageError> {
        self.calls.remove.fetch_add(1, Ordering::SeqCst);
        self.answer.into_result(name.as_str())
    }

    async fn pull_image(&self, opts: &PullOptions, sink: &OutputSink) -> Result<(), ImageError> {
        self.calls.pull.fetch_add(1, Ordering::SeqCst);
        sink.write_line(br#"{"status":"Pulling"}"#)
            .map_err(|e| ImageError::PullFailed(e.to_string()))?;
        self.answer.into_result(&opts.from_image())
    }

    async fn push_image(
        &self,
        opts: &PushOptions,
        _auth: &RegistryAuth,
        sink: &OutputSink,
    ) -> Result<(), ImageError> {
        self.calls.push.fetch_add(1, Ordering::SeqCst);
        sink.write_line(br#"{"status":"Pushing"}"#)
            .map_err(|e| ImageError::PushFailed(e.to_string()))?;
        self.answer.into_result(&opts.reference())
    }
}

/// Placement store that counts forgets and can be switched off or broken.
#[derive(Default)]
pub struct ObservedPlacement {
    records: Mutex<Vec<(ImageName, NodeId)>>,
    disabled: bool,
    broken: bool,
    failing_forget: bool,
    pub forgets: AtomicUsize,
}

#[allow(dead_code)]
impl ObservedPlacement {
    pub fn tracking() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Default::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    /// Store whose `forget` always fails; lookups still work.
    pub fn failing_forget() -> Self {
        Self {
            failing_forget: true,
            ..Default::default()
        }
    }

    pub fn with_record(self, image: &str, node: &str) -> Self {
        self.records
            .lock()
            .push((ImageName::new(image).unwrap(), NodeId::new(node)));
        self
    }

    pub fn forgets(&self) -> usize {
        self.forgets.load(Ordering::SeqCst)
    }

    pub fn holds(&self, image: &str) -> bool {
        self.records.lock().iter().any(|(i, _)| i.as_str() == image)
    }
}

#[async_trait]
impl PlacementStore for ObservedPlacement {
    async fn lookup(&self, image: &ImageName) -> Result<Placement, PlacementError> {
        if self.broken {
            return Err(PlacementError::Unavailable("store offline".to_string()));
        }
        if self.disabled {
            return Ok(Placement::TrackingDisabled);
        }
        Ok(self
            .records
            .lock()
            .iter()
            .find(|(i, _)| i == image)
            .map(|(_, node)| Placement::Node(node.clone()))
            .unwrap_or(Placement::NotRecorded))
    }

    async fn record(&self, image: &ImageName, node: &NodeId) -> Result<(), PlacementError> {
        let mut records = self.records.lock();
        records.retain(|(i, _)| i != image);
        records.push((image.clone(), node.clone()));
        Ok(())
    }

    async fn forget(&self, image: &ImageName) -> Result<(), PlacementError> {
        self.forgets.fetch_add(1, Ordering::SeqCst);
        if self.failing_forget {
            return Err(PlacementError::Backend("write rejected".to_string()));
        }
        self.records.lock().retain(|(i, _)| i != image);
        Ok(())
    }
}

/// A cluster of fake nodes named n1, n2, ... with the given answers.
pub struct TestCluster {
    pub cluster: Cluster,
    pub placement: Arc<ObservedPlacement>,
    pub calls: Vec<Arc<Calls>>,
}

impl TestCluster {
    pub fn new(answers: &[Answer], placement: ObservedPlacement) -> Self {
        init_tracing();

        let membership = Membership::new();
        let mut calls = Vec::new();
        for (i, answer) in answers.iter().enumerate() {
            let node_calls = Arc::new(Calls::default());
            membership.register(Node::new(
                NodeId::new(format!("n{}", i + 1)),
                FakeNode {
                    answer: *answer,
                    calls: node_calls.clone(),
                },
            ));
            calls.push(node_calls);
        }

        let placement = Arc::new(placement);
        let cluster = Cluster::new(Arc::new(membership), placement.clone());
        Self {
            cluster,
            placement,
            calls,
        }
    }

    /// Calls made to node `n` (1-based, like the node names).
    pub fn node(&self, n: usize) -> &Calls {
        &self.calls[n - 1]
    }
}

#[allow(dead_code)]
pub fn image(name: &str) -> ImageName {
    ImageName::new(name).unwrap()
}
