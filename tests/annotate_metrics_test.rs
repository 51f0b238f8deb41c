//! Metric annotation against a full sliced evaluation result.
//!
//! The fixture covers single-feature slices, crossed slices, the overall
//! slice, and both point and confidence-interval metric encodings.

use serde_json::json;

use cardtrail::card::{ModelCard, PerformanceMetric};
use cardtrail::payload::{annotate_eval_result_metrics, EvalResult};
use cardtrail::Error;

fn sliced_eval_result() -> EvalResult {
    serde_json::from_value(json!({
        "slicing_metrics": [
            {
                "slice_key": [["weekday", 0]],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 0.07875693589448929},
                    "prediction/mean": {"boundedValue": {
                        "value": 0.5100112557411194,
                        "lower_bound": 0.4100112557411194,
                        "upper_bound": 0.6100112557411194
                    }}
                }}}
            },
            {
                "slice_key": [["weekday", 1]],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 4.4887189865112305},
                    "prediction/mean": {"boundedValue": {
                        "value": 0.4839990735054016,
                        "lower_bound": 0.3839990735054016,
                        "upper_bound": 0.5839990735054016
                    }}
                }}}
            },
            {
                "slice_key": [["weekday", 2]],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 2.092138290405273},
                    "prediction/mean": {"boundedValue": {
                        "value": 0.3767518997192383,
                        "lower_bound": 0.1767518997192383,
                        "upper_bound": 0.5767518997192383
                    }}
                }}}
            },
            {
                "slice_key": [["gender", "male"], ["age", 10]],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 2.092138290405273},
                    "prediction/mean": {"boundedValue": {
                        "value": 0.3767518997192383,
                        "lower_bound": 0.1767518997192383,
                        "upper_bound": 0.5767518997192383
                    }}
                }}}
            },
            {
                "slice_key": [["gender", "female"], ["age", 20]],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 2.092138290405273},
                    "prediction/mean": {"doubleValue": 0.3767518997192383}
                }}}
            },
            {
                "slice_key": [],
                "metrics": {"": {"": {
                    "average_loss": {"doubleValue": 1.092138290405273},
                    "prediction/mean": {"boundedValue": {
                        "value": 0.4767518997192383,
                        "lower_bound": 0.2767518997192383,
                        "upper_bound": 0.6767518997192383
                    }}
                }}}
            }
        ]
    }))
    .unwrap()
}

#[test]
fn test_annotate_full_sliced_eval_result() {
    let mut card = ModelCard::new();
    annotate_eval_result_metrics(&mut card, &sliced_eval_result()).unwrap();

    let expected = vec![
        PerformanceMetric::new("average_loss", "0.07875693589448929", "weekday_0"),
        PerformanceMetric::new("prediction/mean", "0.5100112557411194", "weekday_0"),
        PerformanceMetric::new("average_loss", "4.4887189865112305", "weekday_1"),
        PerformanceMetric::new("prediction/mean", "0.4839990735054016", "weekday_1"),
        PerformanceMetric::new("average_loss", "2.092138290405273", "weekday_2"),
        PerformanceMetric::new("prediction/mean", "0.3767518997192383", "weekday_2"),
        PerformanceMetric::new("average_loss", "2.092138290405273", "gender_male_X_age_10"),
        PerformanceMetric::new("prediction/mean", "0.3767518997192383", "gender_male_X_age_10"),
        PerformanceMetric::new("average_loss", "2.092138290405273", "gender_female_X_age_20"),
        PerformanceMetric::new("prediction/mean", "0.3767518997192383", "gender_female_X_age_20"),
        PerformanceMetric::new("average_loss", "1.092138290405273", ""),
        PerformanceMetric::new("prediction/mean", "0.4767518997192383", ""),
    ];
    assert_eq!(card.quantitative_analysis.performance_metrics, expected);
}

#[test]
fn test_annotate_appends_to_existing_metrics() {
    let mut card = ModelCard::new();
    card.quantitative_analysis
        .performance_metrics
        .push(PerformanceMetric::new("precomputed", "1.0", ""));

    annotate_eval_result_metrics(&mut card, &sliced_eval_result()).unwrap();

    let metrics = &card.quantitative_analysis.performance_metrics;
    assert_eq!(metrics.len(), 13);
    assert_eq!(metrics[0].metric_type, "precomputed");
    assert_eq!(metrics[1].metric_type, "average_loss");
}

#[test]
fn test_annotate_rejects_unpaired_slice_keys() {
    let eval_result: EvalResult = serde_json::from_value(json!({
        "slicing_metrics": [{
            "slice_key": ["weekday", 0],
            "metrics": {"": {"": {"average_loss": {"doubleValue": 1.0}}}}
        }]
    }))
    .unwrap();

    let mut card = ModelCard::new();
    let err = annotate_eval_result_metrics(&mut card, &eval_result).unwrap_err();
    assert!(matches!(err, Error::InvalidSliceKey(_)));
    assert!(card.quantitative_analysis.performance_metrics.is_empty());
}

#[test]
fn test_annotate_rejects_unknown_metric_encodings() {
    let eval_result: EvalResult = serde_json::from_value(json!({
        "slicing_metrics": [{
            "slice_key": [],
            "metrics": {"": {"": {
                "confusion_matrix": {"matrixValue": {"rows": 2, "cols": 2}}
            }}}
        }]
    }))
    .unwrap();

    let mut card = ModelCard::new();
    let err = annotate_eval_result_metrics(&mut card, &eval_result).unwrap_err();
    match err {
        Error::UnexpectedMetricValue(found) => assert!(found.contains("matrixValue")),
        other => panic!("expected UnexpectedMetricValue, got {other:?}"),
    }
}
