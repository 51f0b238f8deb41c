//! Metadata graph model and store access.
//!
//! The metadata store records a bipartite provenance graph: artifacts
//! (datasets, statistics, models, evaluations) on one side, executions
//! (pipeline step runs) on the other, with events as the edges between
//! them. This module defines snapshot types for those entities and the
//! [`MetadataStore`] trait the lineage queries run against.

mod store;
mod types;

pub use store::{MemoryMetadataStore, MetadataStore};
pub use types::{
    Artifact, ArtifactBuilder, ArtifactType, Event, EventKind, Execution, ExecutionBuilder,
    ExecutionType, MetadataNode, PropertyValue,
};
