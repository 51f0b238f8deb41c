//! Artifact payload readers.
//!
//! Lineage queries end at artifact URIs; this module reads what those
//! URIs point at. Statistics artifacts carry binary proto payloads
//! (optionally TFRecord-framed), evaluation artifacts carry sliced
//! metrics as JSON. A payload that was simply never written is reported
//! as `None`; a payload that exists but cannot be understood is an error.

mod eval;
mod stats;

pub use eval::{
    annotate_eval_result_metrics, read_eval_result, EvalResult, SlicedMetrics, EVAL_RESULT_FILE,
};
pub use stats::{
    read_stats, write_tfrecord, DatasetFeatureStatistics, DatasetFeatureStatisticsList,
    FeatureNameStatistics, FeatureType, TfRecordReader, FEATURE_STATS_FILE, STATS_TFRECORD_FILE,
};
