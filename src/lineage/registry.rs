//! Resolution of the well-known pipeline node types.
//!
//! Every lineage query needs the store-assigned ids of the standard
//! artifact types (datasets, statistics, models, evaluations) and of the
//! trainer execution type. [`PipelineTypes`] resolves them once per query
//! so the store is hit a bounded number of times regardless of graph size.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::metadata::{Artifact, ArtifactType, ExecutionType, MetadataStore};

/// Artifact type name of example datasets.
pub const DATASET_TYPE_NAME: &str = "Examples";
/// Artifact type name of dataset statistics bundles.
pub const STATS_TYPE_NAME: &str = "ExampleStatistics";
/// Artifact type name of trained models.
pub const MODEL_TYPE_NAME: &str = "Model";
/// Artifact type name of model evaluation outputs.
pub const METRICS_TYPE_NAME: &str = "ModelEvaluation";
/// Execution type name of trainer runs.
pub const TRAINER_TYPE_NAME: &str = "tfx.components.trainer.component.Trainer";

/// The resolved standard node types of one metadata store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTypes {
    /// Type of example datasets
    pub dataset_type: ArtifactType,
    /// Type of dataset statistics bundles
    pub stats_type: ArtifactType,
    /// Type of trained models
    pub model_type: ArtifactType,
    /// Type of model evaluation outputs
    pub metrics_type: ArtifactType,
    /// Type of trainer runs
    pub trainer_type: ExecutionType,
}

impl PipelineTypes {
    /// Resolve the standard types from a store.
    ///
    /// Type names are matched exactly and case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArtifactTypes`] or
    /// [`Error::MissingExecutionTypes`] naming every absent type, sorted,
    /// when the store was not populated by a standard pipeline run.
    pub fn from_store<S: MetadataStore + ?Sized>(store: &S) -> Result<Self> {
        let mut artifact_types: HashMap<String, ArtifactType> = store
            .get_artifact_types()?
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();

        let required = [
            DATASET_TYPE_NAME,
            STATS_TYPE_NAME,
            MODEL_TYPE_NAME,
            METRICS_TYPE_NAME,
        ];
        let mut missing: Vec<String> = required
            .iter()
            .filter(|name| !artifact_types.contains_key(**name))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(Error::MissingArtifactTypes(missing));
        }

        let trainer_type = store
            .get_execution_types()?
            .into_iter()
            .find(|t| t.name == TRAINER_TYPE_NAME)
            .ok_or_else(|| {
                Error::MissingExecutionTypes(vec![TRAINER_TYPE_NAME.to_string()])
            })?;

        // Unwraps are fine: presence was checked above
        Ok(Self {
            dataset_type: artifact_types.remove(DATASET_TYPE_NAME).unwrap(),
            stats_type: artifact_types.remove(STATS_TYPE_NAME).unwrap(),
            model_type: artifact_types.remove(MODEL_TYPE_NAME).unwrap(),
            metrics_type: artifact_types.remove(METRICS_TYPE_NAME).unwrap(),
            trainer_type,
        })
    }

    /// Fetch a model artifact and check it really is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] when no artifact has the given id,
    /// or [`Error::NotAModel`] when the artifact exists but has a
    /// different type.
    pub fn validate_model<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        model_id: i64,
    ) -> Result<Artifact> {
        let artifact = store
            .get_artifacts_by_ids(&[model_id])?
            .into_iter()
            .next()
            .ok_or(Error::ModelNotFound(model_id))?;

        if artifact.type_id() != self.model_type.id {
            return Err(Error::NotAModel {
                id: model_id,
                type_id: artifact.type_id(),
                expected_type_id: self.model_type.id,
            });
        }
        Ok(artifact)
    }
}
