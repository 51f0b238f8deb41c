//! Model-centric lineage queries.
//!
//! Each query starts from a model artifact id, validates it, and walks the
//! provenance graph to the artifacts or executions a model card needs:
//! evaluation outputs, dataset statistics, and the trainer runs that
//! produced the model.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::card::{ModelCard, Reference};
use crate::error::Result;
use crate::lineage::registry::PipelineTypes;
use crate::lineage::walker::{one_hop_artifacts, one_hop_executions, Direction};
use crate::metadata::{Artifact, MetadataNode, MetadataStore};

/// URI fragment marking an artifact as the output of a transform step.
pub const TRANSFORM_PATH_MARKER: &str = "/Transform/";

fn resolve_types<'a, S: MetadataStore + ?Sized>(
    store: &S,
    provided: Option<&'a PipelineTypes>,
) -> Result<Cow<'a, PipelineTypes>> {
    match provided {
        Some(types) => Ok(Cow::Borrowed(types)),
        None => Ok(Cow::Owned(PipelineTypes::from_store(store)?)),
    }
}

/// Find the evaluation artifacts computed from a model.
///
/// Walks downstream from the model to the runs that consumed it and
/// returns their evaluation outputs, deduplicated and in ascending id
/// order. A model that was never evaluated yields an empty list.
///
/// `pipeline_types` overrides type resolution for stores populated with
/// custom type definitions; pass `None` to resolve the standard names.
///
/// # Errors
///
/// Returns a type-resolution error when the store is missing the standard
/// types, [`Error::ModelNotFound`](crate::Error::ModelNotFound) or
/// [`Error::NotAModel`](crate::Error::NotAModel) when `model_id` does not
/// name a model, and [`Error::Store`](crate::Error::Store) on backend
/// failures.
pub fn metrics_artifacts_for_model<S: MetadataStore + ?Sized>(
    store: &S,
    model_id: i64,
    pipeline_types: Option<&PipelineTypes>,
) -> Result<Vec<Artifact>> {
    let types = resolve_types(store, pipeline_types)?;
    types.validate_model(store, model_id)?;
    one_hop_artifacts(
        store,
        &[model_id],
        Direction::Successor,
        Some(&types.metrics_type),
    )
}

/// Find the statistics artifacts of the datasets a model was trained on.
///
/// Walks upstream from the model to its training datasets. Datasets whose
/// URI contains [`TRANSFORM_PATH_MARKER`] are transform outputs, so the
/// walk takes one more upstream hop from those to reach the original
/// datasets. The statistics artifacts computed from the combined dataset
/// set are returned, deduplicated and in ascending id order.
///
/// # Errors
///
/// Same failure cases as [`metrics_artifacts_for_model`].
pub fn stats_artifacts_for_model<S: MetadataStore + ?Sized>(
    store: &S,
    model_id: i64,
    pipeline_types: Option<&PipelineTypes>,
) -> Result<Vec<Artifact>> {
    let types = resolve_types(store, pipeline_types)?;
    types.validate_model(store, model_id)?;

    let trainer_examples = one_hop_artifacts(
        store,
        &[model_id],
        Direction::Ancestor,
        Some(&types.dataset_type),
    )?;

    let mut dataset_ids = BTreeSet::new();
    let mut transformed_ids = Vec::new();
    for example in &trainer_examples {
        if example.uri().contains(TRANSFORM_PATH_MARKER) {
            transformed_ids.push(example.id());
        } else {
            dataset_ids.insert(example.id());
        }
    }
    let originals = one_hop_artifacts(
        store,
        &transformed_ids,
        Direction::Ancestor,
        Some(&types.dataset_type),
    )?;
    dataset_ids.extend(originals.iter().map(Artifact::id));

    let dataset_ids: Vec<i64> = dataset_ids.into_iter().collect();
    one_hop_artifacts(
        store,
        &dataset_ids,
        Direction::Successor,
        Some(&types.stats_type),
    )
}

/// Build a model card from the lineage of a model artifact.
///
/// The card is filled from the trainer runs that produced the model: the
/// model name comes from the newest run's `module_file` property, while
/// the version checksum (`checksum_md5`) and the pipeline reference
/// (`pipeline_name`) come from the oldest run. A model with no recorded
/// trainer run yields an untouched default card; individual missing
/// properties leave their card fields unset.
///
/// # Errors
///
/// Same failure cases as [`metrics_artifacts_for_model`].
pub fn generate_model_card<S: MetadataStore + ?Sized>(
    store: &S,
    model_id: i64,
    pipeline_types: Option<&PipelineTypes>,
) -> Result<ModelCard> {
    let types = resolve_types(store, pipeline_types)?;
    types.validate_model(store, model_id)?;

    let mut card = ModelCard::new();
    let trainers = one_hop_executions(
        store,
        &[model_id],
        Direction::Ancestor,
        Some(&types.trainer_type),
    )?;
    if let (Some(first), Some(last)) = (trainers.first(), trainers.last()) {
        let details = &mut card.model_details;
        details.name = last
            .property_value("module_file", false)
            .map(ToString::to_string);
        details.version.name = first
            .property_value("checksum_md5", false)
            .map(ToString::to_string);
        details.references = vec![Reference {
            reference: first
                .property_value("pipeline_name", false)
                .map(ToString::to_string),
        }];
    }
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lineage::registry::{
        DATASET_TYPE_NAME, METRICS_TYPE_NAME, MODEL_TYPE_NAME, STATS_TYPE_NAME, TRAINER_TYPE_NAME,
    };
    use crate::metadata::{ArtifactType, EventKind, Execution, ExecutionType, MemoryMetadataStore};

    fn seeded_store() -> MemoryMetadataStore {
        let mut store = MemoryMetadataStore::new();
        store.put_artifact_type(DATASET_TYPE_NAME);
        store.put_artifact_type(STATS_TYPE_NAME);
        store.put_artifact_type(MODEL_TYPE_NAME);
        store.put_artifact_type(METRICS_TYPE_NAME);
        store.put_execution_type(TRAINER_TYPE_NAME);
        store
    }

    #[test]
    fn test_queries_validate_the_model_id() {
        let store = seeded_store();
        assert!(matches!(
            metrics_artifacts_for_model(&store, 9, None).unwrap_err(),
            Error::ModelNotFound(9)
        ));
        assert!(matches!(
            stats_artifacts_for_model(&store, 9, None).unwrap_err(),
            Error::ModelNotFound(9)
        ));
        assert!(matches!(
            generate_model_card(&store, 9, None).unwrap_err(),
            Error::ModelNotFound(9)
        ));
    }

    #[test]
    fn test_type_resolution_failure_surfaces_before_traversal() {
        let store = MemoryMetadataStore::new();
        let err = metrics_artifacts_for_model(&store, 1, None).unwrap_err();
        assert!(matches!(err, Error::MissingArtifactTypes(_)));
    }

    #[test]
    fn test_provided_types_skip_store_resolution() {
        // The store registers none of the standard type names; the caller
        // supplies a custom registry instead.
        let mut store = MemoryMetadataStore::new();
        let model_type_id = store.put_artifact_type("my.custom.Model");
        let metrics_type_id = store.put_artifact_type("my.custom.Eval");
        let dataset_type_id = store.put_artifact_type("my.custom.Data");
        let stats_type_id = store.put_artifact_type("my.custom.Stats");
        let trainer_type_id = store.put_execution_type("my.custom.Trainer");
        let evaluator_type_id = store.put_execution_type("my.custom.Evaluator");

        let model_id =
            store.put_artifact(Artifact::builder(model_type_id).uri("/model").build());
        let eval_id =
            store.put_artifact(Artifact::builder(metrics_type_id).uri("/eval").build());
        let run = store.put_execution(Execution::builder(evaluator_type_id).build());
        store.put_event_parts(model_id, run, EventKind::Input);
        store.put_event_parts(eval_id, run, EventKind::Output);

        let types = PipelineTypes {
            dataset_type: ArtifactType::new(dataset_type_id, "my.custom.Data"),
            stats_type: ArtifactType::new(stats_type_id, "my.custom.Stats"),
            model_type: ArtifactType::new(model_type_id, "my.custom.Model"),
            metrics_type: ArtifactType::new(metrics_type_id, "my.custom.Eval"),
            trainer_type: ExecutionType::new(trainer_type_id, "my.custom.Trainer"),
        };

        let metrics = metrics_artifacts_for_model(&store, model_id, Some(&types)).unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].id(), eval_id);
    }

    #[test]
    fn test_card_for_model_without_trainer_run_is_default() {
        let mut store = seeded_store();
        let types = PipelineTypes::from_store(&store).unwrap();
        let model_id =
            store.put_artifact(Artifact::builder(types.model_type.id).uri("/model").build());

        let card = generate_model_card(&store, model_id, None).unwrap();
        assert_eq!(card, ModelCard::default());
    }

    #[test]
    fn test_card_fields_split_between_oldest_and_newest_trainer() {
        let mut store = seeded_store();
        let types = PipelineTypes::from_store(&store).unwrap();
        let model_id =
            store.put_artifact(Artifact::builder(types.model_type.id).uri("/model").build());

        let old_run = store.put_execution(
            Execution::builder(types.trainer_type.id)
                .property("module_file", "trainer_v1.py")
                .property("checksum_md5", "11111111")
                .property("pipeline_name", "taxi_pipeline")
                .build(),
        );
        let new_run = store.put_execution(
            Execution::builder(types.trainer_type.id)
                .property("module_file", "trainer_v2.py")
                .property("checksum_md5", "22222222")
                .property("pipeline_name", "taxi_pipeline_v2")
                .build(),
        );
        store.put_event_parts(model_id, old_run, EventKind::Output);
        store.put_event_parts(model_id, new_run, EventKind::Output);

        let card = generate_model_card(&store, model_id, None).unwrap();
        let details = &card.model_details;
        assert_eq!(details.name.as_deref(), Some("trainer_v2.py"));
        assert_eq!(details.version.name.as_deref(), Some("11111111"));
        assert_eq!(details.references.len(), 1);
        assert_eq!(
            details.references[0].reference.as_deref(),
            Some("taxi_pipeline")
        );
    }

    #[test]
    fn test_card_tolerates_missing_trainer_properties() {
        let mut store = seeded_store();
        let types = PipelineTypes::from_store(&store).unwrap();
        let model_id =
            store.put_artifact(Artifact::builder(types.model_type.id).uri("/model").build());
        let run = store.put_execution(Execution::builder(types.trainer_type.id).build());
        store.put_event_parts(model_id, run, EventKind::Output);

        let card = generate_model_card(&store, model_id, None).unwrap();
        assert!(card.model_details.name.is_none());
        assert!(card.model_details.version.name.is_none());
        // A trainer run exists, so the reference slot is created even
        // though its text is unset
        assert_eq!(card.model_details.references.len(), 1);
        assert!(card.model_details.references[0].reference.is_none());
    }
}
