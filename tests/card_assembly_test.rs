//! Full card assembly walkthrough.
//!
//! Wires a provenance graph whose artifact URIs point at real payload
//! directories, then follows the whole path a card author would: walk the
//! lineage, read the payloads, annotate the card, serialize it.

use std::fs;

use prost::Message;
use serde_json::json;
use tempfile::tempdir;

use cardtrail::lineage::{
    generate_model_card, metrics_artifacts_for_model, stats_artifacts_for_model,
    DATASET_TYPE_NAME, METRICS_TYPE_NAME, MODEL_TYPE_NAME, STATS_TYPE_NAME, TRAINER_TYPE_NAME,
};
use cardtrail::metadata::{Artifact, EventKind, Execution, MemoryMetadataStore};
use cardtrail::payload::{
    annotate_eval_result_metrics, read_eval_result, read_stats, DatasetFeatureStatistics,
    DatasetFeatureStatisticsList, EVAL_RESULT_FILE, FEATURE_STATS_FILE,
};

#[test]
fn test_assemble_card_from_store_and_payloads() {
    // Payloads on disk
    let stats_dir = tempdir().unwrap();
    let split_dir = stats_dir.path().join("Split-eval");
    fs::create_dir_all(&split_dir).unwrap();
    let stats = DatasetFeatureStatisticsList {
        datasets: vec![DatasetFeatureStatistics {
            name: "Split-eval".to_string(),
            num_examples: 5000,
            features: vec![],
            weighted_num_examples: 0.0,
        }],
    };
    fs::write(split_dir.join(FEATURE_STATS_FILE), stats.encode_to_vec()).unwrap();

    let eval_dir = tempdir().unwrap();
    let eval_json = json!({
        "slicing_metrics": [
            {
                "slice_key": [],
                "metrics": {"": {"": {"binary_accuracy": {"doubleValue": 0.71625}}}}
            },
            {
                "slice_key": [["weekday", 0]],
                "metrics": {"": {"": {"binary_accuracy": {"doubleValue": 0.709}}}}
            }
        ]
    });
    fs::write(
        eval_dir.path().join(EVAL_RESULT_FILE),
        eval_json.to_string(),
    )
    .unwrap();

    // Provenance graph pointing at those directories
    let mut store = MemoryMetadataStore::new();
    let dataset_type = store.put_artifact_type(DATASET_TYPE_NAME);
    let stats_type = store.put_artifact_type(STATS_TYPE_NAME);
    let model_type = store.put_artifact_type(MODEL_TYPE_NAME);
    let metrics_type = store.put_artifact_type(METRICS_TYPE_NAME);
    let trainer_type = store.put_execution_type(TRAINER_TYPE_NAME);
    let stats_gen_type =
        store.put_execution_type("tfx.components.statistics_gen.component.StatisticsGen");
    let evaluator_type =
        store.put_execution_type("tfx.components.evaluator.component.Evaluator");

    let examples = store.put_artifact(
        Artifact::builder(dataset_type)
            .uri("/pipelines/taxi/CsvExampleGen/examples/1")
            .build(),
    );
    let stats_artifact = store.put_artifact(
        Artifact::builder(stats_type)
            .uri(stats_dir.path().to_str().unwrap())
            .build(),
    );
    let model = store.put_artifact(
        Artifact::builder(model_type)
            .uri("/pipelines/taxi/Trainer/model/3")
            .build(),
    );
    let metrics_artifact = store.put_artifact(
        Artifact::builder(metrics_type)
            .uri(eval_dir.path().to_str().unwrap())
            .build(),
    );

    let stats_gen = store.put_execution(Execution::builder(stats_gen_type).build());
    let trainer = store.put_execution(
        Execution::builder(trainer_type)
            .property("module_file", "taxi_trainer.py")
            .property("checksum_md5", "d41d8cd98f00b204e9800998ecf8427e")
            .property("pipeline_name", "chicago_taxi_pipeline")
            .build(),
    );
    let evaluator = store.put_execution(Execution::builder(evaluator_type).build());

    store.put_event_parts(examples, stats_gen, EventKind::Input);
    store.put_event_parts(stats_artifact, stats_gen, EventKind::Output);
    store.put_event_parts(examples, trainer, EventKind::Input);
    store.put_event_parts(model, trainer, EventKind::Output);
    store.put_event_parts(model, evaluator, EventKind::Input);
    store.put_event_parts(metrics_artifact, evaluator, EventKind::Output);

    // Walk the lineage
    let mut card = generate_model_card(&store, model, None).unwrap();
    assert_eq!(card.model_details.name.as_deref(), Some("taxi_trainer.py"));

    let found_stats = stats_artifacts_for_model(&store, model, None).unwrap();
    assert_eq!(found_stats.len(), 1);
    let found_metrics = metrics_artifacts_for_model(&store, model, None).unwrap();
    assert_eq!(found_metrics.len(), 1);

    // Read the payloads the walk discovered
    let loaded_stats = read_stats(found_stats[0].uri(), "Split-eval")
        .unwrap()
        .unwrap();
    assert_eq!(loaded_stats.datasets[0].num_examples, 5000);
    assert!(read_stats(found_stats[0].uri(), "Split-train").unwrap().is_none());

    let eval_result = read_eval_result(found_metrics[0].uri(), None)
        .unwrap()
        .unwrap();
    annotate_eval_result_metrics(&mut card, &eval_result).unwrap();

    // The finished card
    let metrics = &card.quantitative_analysis.performance_metrics;
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].slice, "");
    assert_eq!(metrics[1].slice, "weekday_0");

    let rendered = card.to_json().unwrap();
    assert!(rendered.contains("taxi_trainer.py"));
    assert!(rendered.contains("chicago_taxi_pipeline"));
    assert!(rendered.contains("binary_accuracy"));
    assert!(rendered.contains("0.71625"));
}
