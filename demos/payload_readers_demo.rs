//! Artifact Payload Readers Example
//!
//! Writes dataset statistics in both on-disk layouts plus an evaluation
//! result document into a scratch directory, then reads everything back
//! the way the card queries do, including the expected-absence paths.
//!
//! Run with: cargo run --example payload_readers_demo

use std::fs::{self, File};

use serde_json::json;
use tracing_subscriber::EnvFilter;

use cardtrail::card::ModelCard;
use cardtrail::payload::{
    annotate_eval_result_metrics, read_eval_result, read_stats, write_tfrecord,
    DatasetFeatureStatistics, DatasetFeatureStatisticsList, FeatureNameStatistics, FeatureType,
    EVAL_RESULT_FILE, FEATURE_STATS_FILE, STATS_TFRECORD_FILE,
};
use prost::Message;

fn main() -> anyhow::Result<()> {
    println!("=== Cardtrail: Artifact Payload Readers ===\n");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cardtrail=warn")),
        )
        .init();

    // -------------------------------------------------------------------------
    // 1. Write statistics in both on-disk layouts
    // -------------------------------------------------------------------------
    println!("1. Writing statistics payloads...");

    let stats = DatasetFeatureStatisticsList {
        datasets: vec![DatasetFeatureStatistics {
            name: "Split-train".to_string(),
            num_examples: 10_000,
            features: vec![
                FeatureNameStatistics {
                    name: "trip_miles".to_string(),
                    feature_type: FeatureType::Float as i32,
                },
                FeatureNameStatistics {
                    name: "payment_type".to_string(),
                    feature_type: FeatureType::String as i32,
                },
            ],
            weighted_num_examples: 0.0,
        }],
    };

    let stats_dir = tempfile::tempdir()?;
    let train_dir = stats_dir.path().join("Split-train");
    fs::create_dir_all(&train_dir)?;
    fs::write(train_dir.join(FEATURE_STATS_FILE), stats.encode_to_vec())?;
    println!("   Wrote raw proto: Split-train/{FEATURE_STATS_FILE}");

    let eval_dir = stats_dir.path().join("Split-eval");
    fs::create_dir_all(&eval_dir)?;
    let mut container = File::create(eval_dir.join(STATS_TFRECORD_FILE))?;
    write_tfrecord(&mut container, &stats.encode_to_vec())?;
    println!("   Wrote TFRecord container: Split-eval/{STATS_TFRECORD_FILE}");

    // -------------------------------------------------------------------------
    // 2. Read the statistics back, one split at a time
    // -------------------------------------------------------------------------
    println!("\n2. Reading statistics back...");

    let stats_uri = stats_dir.path().to_string_lossy().to_string();
    for split in ["Split-train", "Split-eval"] {
        let loaded = read_stats(&stats_uri, split)?.unwrap();
        let dataset = &loaded.datasets[0];
        println!("   {split}: {} examples", dataset.num_examples);
        for feature in &dataset.features {
            println!("      {} ({:?})", feature.name, feature.feature_kind());
        }
    }

    // -------------------------------------------------------------------------
    // 3. Probe a split that was never computed
    // -------------------------------------------------------------------------
    println!("\n3. Probing a missing split (warns, does not fail)...");

    let missing = read_stats(&stats_uri, "Split-holdout")?;
    println!("   Split-holdout: {missing:?}");

    // -------------------------------------------------------------------------
    // 4. Write and read an evaluation result
    // -------------------------------------------------------------------------
    println!("\n4. Reading an evaluation result...");

    let metrics_dir = tempfile::tempdir()?;
    let eval_json = json!({
        "slicing_metrics": [
            {
                "slice_key": [],
                "metrics": {"": {"": {
                    "binary_accuracy": {"doubleValue": 0.71625},
                    "auc": {"boundedValue": {
                        "value": 0.746, "lower_bound": 0.724, "upper_bound": 0.768
                    }}
                }}}
            },
            {
                "slice_key": [["payment_type", "Cash"]],
                "metrics": {"": {"": {
                    "binary_accuracy": {"doubleValue": 0.683}
                }}}
            }
        ]
    });
    fs::write(
        metrics_dir.path().join(EVAL_RESULT_FILE),
        serde_json::to_string(&eval_json)?,
    )?;

    let eval_result = read_eval_result(metrics_dir.path(), Some("json"))?.unwrap();
    println!("   Loaded {} sliced metrics", eval_result.slicing_metrics.len());

    // A format hint other than JSON is rejected up front
    let rejected = read_eval_result(metrics_dir.path(), Some("tfrecord")).unwrap_err();
    println!("   Non-JSON hint rejected: {rejected}");

    // -------------------------------------------------------------------------
    // 5. Annotate the metrics onto a card
    // -------------------------------------------------------------------------
    println!("\n5. Annotating a model card...");

    let mut card = ModelCard::new();
    card.model_details.name = Some("taxi_trainer.py".to_string());
    annotate_eval_result_metrics(&mut card, &eval_result)?;

    for metric in &card.quantitative_analysis.performance_metrics {
        let slice = if metric.slice.is_empty() {
            "(overall)"
        } else {
            &metric.slice
        };
        println!("   {} = {} on {}", metric.metric_type, metric.value, slice);
    }

    println!("\n=== Payload Readers Complete ===");
    Ok(())
}
