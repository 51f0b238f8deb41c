//! Evaluation result payloads.
//!
//! An evaluation artifact's URI points at a directory holding the sliced
//! metrics the evaluator wrote, serialized as `eval_result.json`. The
//! metric values inside are kept loosely typed: the payload is owned by
//! the evaluator, so unexpected shapes must surface as errors rather than
//! deserialization failures.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::card::{ModelCard, PerformanceMetric};
use crate::error::{Error, Result};

/// File name of the serialized evaluation result inside the artifact URI.
pub const EVAL_RESULT_FILE: &str = "eval_result.json";

/// A model evaluation: per-slice metrics plus run provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalResult {
    /// Metrics per data slice, in the order the evaluator emitted them
    pub slicing_metrics: Vec<SlicedMetrics>,
    /// Per-slice plot data, untouched by this crate
    pub plots: Option<Value>,
    /// Per-slice attribution data, untouched by this crate
    pub attributions: Option<Value>,
    /// Evaluation configuration, untouched by this crate
    pub config: Option<Value>,
    /// Where the evaluated data lives
    pub data_location: Option<String>,
    /// Serialization format of the evaluated data
    pub file_format: Option<String>,
    /// Where the evaluated model lives
    pub model_location: Option<String>,
}

/// Metrics for one slice of the evaluation data.
///
/// `slice_key` is a sequence of `(feature, value)` pairs, empty for the
/// overall dataset. `metrics` nests output name, then sub key, then
/// metric name, as the evaluator writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicedMetrics {
    /// The slice selector
    pub slice_key: Value,
    /// The metric values measured on that slice
    pub metrics: Value,
}

/// Load the evaluation result stored under a metrics artifact URI.
///
/// `output_file_format` is the format hint recorded alongside the
/// artifact; only JSON payloads are understood, so any other hint is
/// rejected. A missing payload file and a payload with no sliced metrics
/// are both expected states, logged at warn level and reported as
/// `Ok(None)`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEvalFormat`] for a non-JSON format hint,
/// [`Error::Io`] when the payload exists but cannot be read, and
/// [`Error::Json`] when it is not a valid evaluation result document.
pub fn read_eval_result(
    metrics_uri: impl AsRef<Path>,
    output_file_format: Option<&str>,
) -> Result<Option<EvalResult>> {
    if let Some(format) = output_file_format {
        if !format.is_empty() && format != "json" {
            return Err(Error::UnsupportedEvalFormat(format.to_string()));
        }
    }

    let path = metrics_uri.as_ref().join(EVAL_RESULT_FILE);
    if !path.exists() {
        warn!(uri = %metrics_uri.as_ref().display(), "cannot load eval results");
        return Ok(None);
    }
    let bytes = std::fs::read_to_string(&path)?;
    let result: EvalResult = serde_json::from_str(&bytes)?;
    if result.slicing_metrics.is_empty() {
        warn!(uri = %metrics_uri.as_ref().display(), "eval results contain no sliced metrics");
        return Ok(None);
    }
    Ok(Some(result))
}

/// Render a scalar JSON value the way the evaluator's text output does.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Join a slice key into its flat label, e.g. `gender_male_X_age_10`.
///
/// The overall slice (an empty key) yields the empty label.
fn slice_label(slice_key: &Value) -> Result<String> {
    let invalid = || Error::InvalidSliceKey(slice_key.to_string());
    let pairs = slice_key.as_array().ok_or_else(invalid)?;

    let mut parts = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let pair = pair.as_array().filter(|p| p.len() == 2).ok_or_else(invalid)?;
        let feature = scalar_text(&pair[0]).ok_or_else(invalid)?;
        let value = scalar_text(&pair[1]).ok_or_else(invalid)?;
        parts.push(format!("{feature}_{value}"));
    }
    Ok(parts.join("_X_"))
}

/// Extract the text rendering of one metric value.
fn metric_text(metric_value: &Value) -> Result<String> {
    let unexpected = || Error::UnexpectedMetricValue(metric_value.to_string());
    let map = metric_value.as_object().ok_or_else(unexpected)?;

    if let Some(double) = map.get("doubleValue") {
        return scalar_text(double).ok_or_else(unexpected);
    }
    if let Some(bounded) = map.get("boundedValue") {
        let value = bounded.get("value").ok_or_else(unexpected)?;
        return scalar_text(value).ok_or_else(unexpected);
    }
    Err(unexpected())
}

/// Append one performance metric entry per metric in the evaluation
/// result to the card's quantitative analysis section.
///
/// Entries keep the evaluator's emission order. Point metrics use their
/// `doubleValue` rendering; confidence-interval metrics use the point
/// estimate inside `boundedValue`. On error the card keeps the entries
/// appended before the failure.
///
/// # Errors
///
/// Returns [`Error::InvalidSliceKey`] for a slice key that is not a
/// sequence of pairs, and [`Error::UnexpectedMetricValue`] for a metric
/// that carries neither a `doubleValue` nor a `boundedValue`.
pub fn annotate_eval_result_metrics(
    card: &mut ModelCard,
    eval_result: &EvalResult,
) -> Result<()> {
    for sliced in &eval_result.slicing_metrics {
        let slice_name = slice_label(&sliced.slice_key)?;
        let outputs = sliced
            .metrics
            .as_object()
            .ok_or_else(|| Error::UnexpectedMetricValue(sliced.metrics.to_string()))?;
        for sub_keys in outputs.values() {
            let sub_keys = sub_keys
                .as_object()
                .ok_or_else(|| Error::UnexpectedMetricValue(sub_keys.to_string()))?;
            for metrics in sub_keys.values() {
                let metrics = metrics
                    .as_object()
                    .ok_or_else(|| Error::UnexpectedMetricValue(metrics.to_string()))?;
                for (metric_name, metric_value) in metrics {
                    card.quantitative_analysis.performance_metrics.push(
                        PerformanceMetric::new(
                            metric_name.clone(),
                            metric_text(metric_value)?,
                            slice_name.clone(),
                        ),
                    );
                }
            }
        }
    }
    Ok(())
}
