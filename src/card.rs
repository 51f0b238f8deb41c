//! Model card document model.
//!
//! A trimmed rendition of the model card schema covering the sections the
//! lineage queries and payload annotators populate. Field names follow the
//! published JSON schema, so a serialized card drops straight into
//! downstream card renderers.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single metric measured on one slice of the evaluation data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    /// Metric name, e.g. `"accuracy"` or `"post_export_metrics/example_count"`
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Metric value rendered as text, exactly as the evaluation emitted it
    pub value: String,
    /// Slice label; empty for the overall (unsliced) dataset
    pub slice: String,
}

impl PerformanceMetric {
    /// Create a metric entry.
    #[must_use]
    pub fn new(
        metric_type: impl Into<String>,
        value: impl Into<String>,
        slice: impl Into<String>,
    ) -> Self {
        Self {
            metric_type: metric_type.into(),
            value: value.into(),
            slice: slice.into(),
        }
    }
}

/// Quantitative analysis section: sliced performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantitativeAnalysis {
    /// Metrics in the order the evaluation reported them
    pub performance_metrics: Vec<PerformanceMetric>,
}

/// A pointer to supporting material, e.g. a pipeline or paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Free-form reference text
    pub reference: Option<String>,
}

impl Reference {
    /// Create a reference entry.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
        }
    }
}

/// Version identification of the model being described.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    /// Version name, e.g. a content checksum
    pub name: Option<String>,
    /// Release date
    pub date: Option<String>,
    /// What changed from the previous version
    pub diff: Option<String>,
}

/// Model details section: identity, version, and references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDetails {
    /// Human-readable model name
    pub name: Option<String>,
    /// Short prose description of the model
    pub overview: Option<String>,
    /// Version identification
    pub version: Version,
    /// Supporting references
    pub references: Vec<Reference>,
}

/// A model card: the structured facts about one trained model.
///
/// Starts empty via [`Default`] and is filled in section by section by the
/// lineage queries and payload annotators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCard {
    /// Model details section
    pub model_details: ModelDetails,
    /// Quantitative analysis section
    pub quantitative_analysis: QuantitativeAnalysis,
}

impl ModelCard {
    /// Create an empty card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the card as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
