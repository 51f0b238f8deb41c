//! Lineage traversal and model-centric queries.
//!
//! Answers "where did this model come from" questions against a metadata
//! store: which evaluations scored it, which dataset statistics describe
//! its training data, and which trainer runs produced it. The three
//! model-centric queries are the entry points; the one-hop graph walk and
//! the type registry they share are exported for callers composing their
//! own traversals.

mod queries;
mod registry;
mod walker;

pub use queries::{
    generate_model_card, metrics_artifacts_for_model, stats_artifacts_for_model,
    TRANSFORM_PATH_MARKER,
};
pub use registry::{
    PipelineTypes, DATASET_TYPE_NAME, METRICS_TYPE_NAME, MODEL_TYPE_NAME, STATS_TYPE_NAME,
    TRAINER_TYPE_NAME,
};
pub use walker::{one_hop_artifacts, one_hop_executions, Direction};
