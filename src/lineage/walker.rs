//! One-hop traversal over the bipartite provenance graph.
//!
//! The graph alternates artifact and execution nodes, so "one hop" from an
//! artifact means two event edges: artifact to the executions on one side
//! of it, then those executions to the artifacts on their other side. Both
//! directions run through the same walk with the event kinds swapped.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::metadata::{Artifact, ArtifactType, EventKind, Execution, ExecutionType, MetadataStore};

/// Which side of the seed artifacts to walk toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Walk upstream, to the artifacts the seeds were derived from.
    Ancestor,
    /// Walk downstream, to the artifacts derived from the seeds.
    Successor,
}

impl Direction {
    /// Event kinds linking the seed artifacts to the executions beside
    /// them: producers when walking upstream, consumers when walking
    /// downstream.
    const fn execution_hop(self) -> [EventKind; 2] {
        match self {
            Self::Ancestor => [EventKind::Output, EventKind::DeclaredOutput],
            Self::Successor => [EventKind::Input, EventKind::DeclaredInput],
        }
    }

    /// Event kinds linking those executions to the artifacts on their
    /// other side.
    const fn artifact_hop(self) -> [EventKind; 2] {
        match self {
            Self::Ancestor => [EventKind::Input, EventKind::DeclaredInput],
            Self::Successor => [EventKind::Output, EventKind::DeclaredOutput],
        }
    }
}

/// Executions one event edge away from the given artifacts.
fn execution_frontier<S: MetadataStore + ?Sized>(
    store: &S,
    artifact_ids: &[i64],
    direction: Direction,
) -> Result<BTreeSet<i64>> {
    let kinds = direction.execution_hop();
    let events = store.get_events_by_artifact_ids(artifact_ids)?;
    Ok(events
        .iter()
        .filter(|e| kinds.contains(&e.kind))
        .map(|e| e.execution_id)
        .collect())
}

/// Walk one hop from the given artifacts to neighboring artifacts.
///
/// With [`Direction::Ancestor`] this returns the artifacts consumed by
/// the executions that produced the seeds; with [`Direction::Successor`]
/// the artifacts produced by the executions that consumed them. Results
/// are deduplicated and in ascending id order. A seed can appear in its
/// own result when the graph loops back through an execution.
///
/// `artifact_type` keeps only artifacts of that type; `None` keeps all.
///
/// # Errors
///
/// Propagates store failures as [`Error::Store`](crate::Error::Store).
pub fn one_hop_artifacts<S: MetadataStore + ?Sized>(
    store: &S,
    artifact_ids: &[i64],
    direction: Direction,
    artifact_type: Option<&ArtifactType>,
) -> Result<Vec<Artifact>> {
    let frontier: Vec<i64> = execution_frontier(store, artifact_ids, direction)?
        .into_iter()
        .collect();

    let kinds = direction.artifact_hop();
    let neighbor_ids: Vec<i64> = store
        .get_events_by_execution_ids(&frontier)?
        .iter()
        .filter(|e| kinds.contains(&e.kind))
        .map(|e| e.artifact_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();

    let mut artifacts = store.get_artifacts_by_ids(&neighbor_ids)?;
    if let Some(wanted) = artifact_type {
        artifacts.retain(|a| a.type_id() == wanted.id);
    }
    Ok(artifacts)
}

/// Walk one event edge from the given artifacts to executions.
///
/// With [`Direction::Ancestor`] this returns the executions that produced
/// the seeds; with [`Direction::Successor`] the executions that consumed
/// them. Results are deduplicated and in ascending id order.
///
/// `execution_type` keeps only executions of that type; `None` keeps all.
///
/// # Errors
///
/// Propagates store failures as [`Error::Store`](crate::Error::Store).
pub fn one_hop_executions<S: MetadataStore + ?Sized>(
    store: &S,
    artifact_ids: &[i64],
    direction: Direction,
    execution_type: Option<&ExecutionType>,
) -> Result<Vec<Execution>> {
    let frontier: Vec<i64> = execution_frontier(store, artifact_ids, direction)?
        .into_iter()
        .collect();

    let mut executions = store.get_executions_by_ids(&frontier)?;
    if let Some(wanted) = execution_type {
        executions.retain(|e| e.type_id() == wanted.id);
    }
    Ok(executions)
}
