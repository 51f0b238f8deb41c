//! Model Card from Lineage Example
//!
//! Walks a small in-memory provenance graph the way a card author would:
//! resolve the pipeline types, generate the card skeleton from trainer
//! lineage, find the evaluation artifacts, and annotate sliced metrics.
//!
//! Run with: cargo run --example model_card_demo

use serde_json::json;

use cardtrail::lineage::{
    generate_model_card, metrics_artifacts_for_model, stats_artifacts_for_model, PipelineTypes,
    DATASET_TYPE_NAME, METRICS_TYPE_NAME, MODEL_TYPE_NAME, STATS_TYPE_NAME, TRAINER_TYPE_NAME,
};
use cardtrail::metadata::{Artifact, EventKind, Execution, MemoryMetadataStore};
use cardtrail::payload::{annotate_eval_result_metrics, EvalResult};

fn main() -> anyhow::Result<()> {
    println!("=== Cardtrail: Model Card from Lineage ===\n");

    // -------------------------------------------------------------------------
    // 1. Record a pipeline run in the metadata store
    // -------------------------------------------------------------------------
    println!("1. Recording a pipeline run...");

    let mut store = MemoryMetadataStore::new();
    let dataset_type = store.put_artifact_type(DATASET_TYPE_NAME);
    let stats_type = store.put_artifact_type(STATS_TYPE_NAME);
    let model_type = store.put_artifact_type(MODEL_TYPE_NAME);
    let metrics_type = store.put_artifact_type(METRICS_TYPE_NAME);
    let trainer_type = store.put_execution_type(TRAINER_TYPE_NAME);
    let transform_type = store.put_execution_type("tfx.components.transform.component.Transform");
    let stats_gen_type =
        store.put_execution_type("tfx.components.statistics_gen.component.StatisticsGen");
    let evaluator_type =
        store.put_execution_type("tfx.components.evaluator.component.Evaluator");

    let raw_examples = store.put_artifact(
        Artifact::builder(dataset_type)
            .uri("/pipelines/taxi/CsvExampleGen/examples/1")
            .build(),
    );
    let raw_stats = store.put_artifact(
        Artifact::builder(stats_type)
            .uri("/pipelines/taxi/StatisticsGen/statistics/2")
            .build(),
    );
    let transformed_examples = store.put_artifact(
        Artifact::builder(dataset_type)
            .uri("/pipelines/taxi/Transform/transformed_examples/3")
            .build(),
    );
    let model = store.put_artifact(
        Artifact::builder(model_type)
            .uri("/pipelines/taxi/Trainer/model/4")
            .build(),
    );
    let evaluation = store.put_artifact(
        Artifact::builder(metrics_type)
            .uri("/pipelines/taxi/Evaluator/evaluation/5")
            .build(),
    );

    let stats_gen = store.put_execution(Execution::builder(stats_gen_type).build());
    let transform = store.put_execution(Execution::builder(transform_type).build());
    let trainer = store.put_execution(
        Execution::builder(trainer_type)
            .property("module_file", "taxi_trainer.py")
            .property("checksum_md5", "d41d8cd98f00b204e9800998ecf8427e")
            .property("pipeline_name", "chicago_taxi_pipeline")
            .build(),
    );
    let evaluator = store.put_execution(Execution::builder(evaluator_type).build());

    store.put_event_parts(raw_examples, stats_gen, EventKind::Input);
    store.put_event_parts(raw_stats, stats_gen, EventKind::Output);
    store.put_event_parts(raw_examples, transform, EventKind::Input);
    store.put_event_parts(transformed_examples, transform, EventKind::Output);
    store.put_event_parts(transformed_examples, trainer, EventKind::Input);
    store.put_event_parts(model, trainer, EventKind::Output);
    store.put_event_parts(model, evaluator, EventKind::Input);
    store.put_event_parts(evaluation, evaluator, EventKind::Output);

    println!("   Artifacts: {}", store.artifact_count());
    println!("   Executions: {}", store.execution_count());
    println!("   Events: {}", store.event_count());

    // -------------------------------------------------------------------------
    // 2. Resolve the pipeline types
    // -------------------------------------------------------------------------
    println!("\n2. Resolving pipeline types...");

    let types = PipelineTypes::from_store(&store)?;
    println!("   Model type id: {}", types.model_type.id);
    println!("   Trainer type: {}", types.trainer_type.name);

    // -------------------------------------------------------------------------
    // 3. Generate the card skeleton from trainer lineage
    // -------------------------------------------------------------------------
    println!("\n3. Generating card from trainer lineage...");

    let mut card = generate_model_card(&store, model, Some(&types))?;
    println!("   Name: {:?}", card.model_details.name);
    println!("   Version: {:?}", card.model_details.version.name);
    println!(
        "   Reference: {:?}",
        card.model_details.references[0].reference
    );

    // -------------------------------------------------------------------------
    // 4. Find the datasets' statistics through the transform step
    // -------------------------------------------------------------------------
    println!("\n4. Finding training data statistics...");

    let stats_artifacts = stats_artifacts_for_model(&store, model, Some(&types))?;
    for artifact in &stats_artifacts {
        println!("   Statistics artifact #{}: {}", artifact.id(), artifact.uri());
    }

    // -------------------------------------------------------------------------
    // 5. Find the evaluation artifacts
    // -------------------------------------------------------------------------
    println!("\n5. Finding evaluation artifacts...");

    let metrics_artifacts = metrics_artifacts_for_model(&store, model, Some(&types))?;
    for artifact in &metrics_artifacts {
        println!("   Evaluation artifact #{}: {}", artifact.id(), artifact.uri());
    }

    // -------------------------------------------------------------------------
    // 6. Annotate sliced metrics onto the card
    // -------------------------------------------------------------------------
    println!("\n6. Annotating sliced metrics...");

    let eval_result: EvalResult = serde_json::from_value(json!({
        "slicing_metrics": [
            {
                "slice_key": [],
                "metrics": {"": {"": {"binary_accuracy": {"doubleValue": 0.71625}}}}
            },
            {
                "slice_key": [["trip_start_hour", 7]],
                "metrics": {"": {"": {"binary_accuracy": {"doubleValue": 0.709}}}}
            },
            {
                "slice_key": [["trip_start_hour", 8], ["payment_type", "Cash"]],
                "metrics": {"": {"": {"binary_accuracy": {"boundedValue": {
                    "value": 0.683, "lower_bound": 0.662, "upper_bound": 0.704
                }}}}}
            }
        ]
    }))?;
    annotate_eval_result_metrics(&mut card, &eval_result)?;

    for metric in &card.quantitative_analysis.performance_metrics {
        let slice = if metric.slice.is_empty() {
            "(overall)"
        } else {
            &metric.slice
        };
        println!("   {} = {} on {}", metric.metric_type, metric.value, slice);
    }

    // -------------------------------------------------------------------------
    // 7. Render the finished card
    // -------------------------------------------------------------------------
    println!("\n7. Finished card:\n");
    println!("{}", card.to_json()?);

    println!("\n=== Model Card Complete ===");
    Ok(())
}
