//! Read access to a pipeline metadata store.
//!
//! [`MetadataStore`] is the seam between the lineage queries and whatever
//! backs the metadata graph. Production deployments wrap a gRPC or SQL
//! client; [`MemoryMetadataStore`] backs tests and demos.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::metadata::types::{Artifact, ArtifactType, Event, EventKind, Execution, ExecutionType};

/// Read-only queries against a metadata store.
///
/// Contract for all by-id lookups: results are returned in ascending id
/// order, duplicate ids are collapsed, and ids with no stored node are
/// skipped silently. Callers that care about "first" and "last" nodes
/// (such as the model card trainer lookup) rely on the ordering part.
pub trait MetadataStore {
    /// List every registered artifact type.
    fn get_artifact_types(&self) -> Result<Vec<ArtifactType>>;

    /// List every registered execution type.
    fn get_execution_types(&self) -> Result<Vec<ExecutionType>>;

    /// Fetch artifacts by id, ascending, skipping unknown ids.
    fn get_artifacts_by_ids(&self, ids: &[i64]) -> Result<Vec<Artifact>>;

    /// Fetch executions by id, ascending, skipping unknown ids.
    fn get_executions_by_ids(&self, ids: &[i64]) -> Result<Vec<Execution>>;

    /// Fetch every event that touches any of the given artifacts.
    fn get_events_by_artifact_ids(&self, artifact_ids: &[i64]) -> Result<Vec<Event>>;

    /// Fetch every event that touches any of the given executions.
    fn get_events_by_execution_ids(&self, execution_ids: &[i64]) -> Result<Vec<Event>>;
}

/// In-memory metadata store.
///
/// Ids are assigned on insert: artifact and execution ids each count up
/// from 1 in their own sequence, while artifact and execution types share
/// a single type-id sequence so a type id identifies a type unambiguously
/// across both namespaces.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    artifact_types: BTreeMap<i64, ArtifactType>,
    execution_types: BTreeMap<i64, ExecutionType>,
    artifacts: BTreeMap<i64, Artifact>,
    executions: BTreeMap<i64, Execution>,
    events: Vec<Event>,
    next_type_id: i64,
    next_artifact_id: i64,
    next_execution_id: i64,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact type, returning its id.
    ///
    /// Registering a name that already exists returns the existing id.
    pub fn put_artifact_type(&mut self, name: impl Into<String>) -> i64 {
        let name = name.into();
        if let Some(existing) = self.artifact_types.values().find(|t| t.name == name) {
            return existing.id;
        }
        let id = self.next_type_id();
        self.artifact_types.insert(id, ArtifactType::new(id, name));
        id
    }

    /// Register an execution type, returning its id.
    ///
    /// Registering a name that already exists returns the existing id.
    pub fn put_execution_type(&mut self, name: impl Into<String>) -> i64 {
        let name = name.into();
        if let Some(existing) = self.execution_types.values().find(|t| t.name == name) {
            return existing.id;
        }
        let id = self.next_type_id();
        self.execution_types.insert(id, ExecutionType::new(id, name));
        id
    }

    /// Store an artifact, assigning and returning its id.
    pub fn put_artifact(&mut self, mut artifact: Artifact) -> i64 {
        self.next_artifact_id += 1;
        let id = self.next_artifact_id;
        artifact.set_id(id);
        self.artifacts.insert(id, artifact);
        id
    }

    /// Store an execution, assigning and returning its id.
    pub fn put_execution(&mut self, mut execution: Execution) -> i64 {
        self.next_execution_id += 1;
        let id = self.next_execution_id;
        execution.set_id(id);
        self.executions.insert(id, execution);
        id
    }

    /// Record an event edge.
    pub fn put_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Record an event edge built from its parts.
    pub fn put_event_parts(&mut self, artifact_id: i64, execution_id: i64, kind: EventKind) {
        self.put_event(Event::new(artifact_id, execution_id, kind));
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Number of stored executions.
    #[must_use]
    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    fn next_type_id(&mut self) -> i64 {
        self.next_type_id += 1;
        self.next_type_id
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn get_artifact_types(&self) -> Result<Vec<ArtifactType>> {
        Ok(self.artifact_types.values().cloned().collect())
    }

    fn get_execution_types(&self) -> Result<Vec<ExecutionType>> {
        Ok(self.execution_types.values().cloned().collect())
    }

    fn get_artifacts_by_ids(&self, ids: &[i64]) -> Result<Vec<Artifact>> {
        // BTreeSet both dedups and yields ascending ids
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.artifacts.get(&id).cloned())
            .collect())
    }

    fn get_executions_by_ids(&self, ids: &[i64]) -> Result<Vec<Execution>> {
        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.executions.get(&id).cloned())
            .collect())
    }

    fn get_events_by_artifact_ids(&self, artifact_ids: &[i64]) -> Result<Vec<Event>> {
        let wanted: BTreeSet<i64> = artifact_ids.iter().copied().collect();
        Ok(self
            .events
            .iter()
            .filter(|e| wanted.contains(&e.artifact_id))
            .copied()
            .collect())
    }

    fn get_events_by_execution_ids(&self, execution_ids: &[i64]) -> Result<Vec<Event>> {
        let wanted: BTreeSet<i64> = execution_ids.iter().copied().collect();
        Ok(self
            .events
            .iter()
            .filter(|e| wanted.contains(&e.execution_id))
            .copied()
            .collect())
    }
}
