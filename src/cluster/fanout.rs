// ABOUTME: Broadcast executor running one operation on every node concurrently.
// ABOUTME: Aggregates outcomes, tolerating caller-chosen ignorable failure kinds.

use super::error::DispatchError;
use super::membership::Node;
use crate::node::{ImageError, ImageErrorKind};
use futures::future::join_all;
use std::future::Future;

/// Run `op` against every node in `nodes` and combine the outcomes.
///
/// All operations run concurrently and are awaited to completion. Results are
/// then read in membership order:
/// - the first success wins and its value is returned;
/// - if every failure has a kind listed in `ignorable`, the first of them is
///   returned wrapped in [`DispatchError::Ignored`];
/// - otherwise the first non-ignorable failure is returned.
pub async fn run_on_nodes<T, F, Fut>(
    nodes: &[Node],
    op: F,
    ignorable: &[ImageErrorKind],
) -> Result<T, DispatchError>
where
    F: Fn(Node) -> Fut,
    Fut: Future<Output = Result<T, ImageError>>,
{
    if nodes.is_empty() {
        return Err(DispatchError::NoNodes);
    }

    let outcomes = join_all(nodes.iter().map(|node| {
        let id = node.id().clone();
        let call = op(node.clone());
        async move { (id, call.await) }
    }))
    .await;

    let mut first_ignored = None;
    let mut first_failure = None;

    for (node, outcome) in outcomes {
        match outcome {
            Ok(value) => return Ok(value),
            Err(source) if ignorable.contains(&source.kind()) => {
                tracing::debug!(%node, error = %source, "ignoring node failure");
                first_ignored.get_or_insert(source);
            }
            Err(source) => {
                tracing::debug!(%node, error = %source, "node failed");
                first_failure.get_or_insert((node, source));
            }
        }
    }

    match (first_failure, first_ignored) {
        (Some((node, source)), _) => Err(DispatchError::Node { node, source }),
        (None, Some(source)) => Err(DispatchError::Ignored {
            nodes: nodes.len(),
            source,
        }),
        (None, None) => Err(DispatchError::NoNodes),
    }
}
