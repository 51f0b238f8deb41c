//! Error types for cardtrail.
//!
//! Every query either fully succeeds or fails outright; there are no
//! retries and no partial results. Expected absences (a missing statistics
//! file, an eval result without sliced metrics, a model without trainer
//! runs) are not errors and are surfaced as `Ok(None)` or default values
//! by the functions concerned.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// cardtrail error types
#[derive(Error, Debug)]
pub enum Error {
    /// The store lacks one or more of the required artifact type names
    #[error("invalid metadata store: missing required artifact types {0:?}")]
    MissingArtifactTypes(Vec<String>),

    /// The store lacks one or more of the required execution type names
    #[error("invalid metadata store: missing required execution types {0:?}")]
    MissingExecutionTypes(Vec<String>),

    /// No artifact exists with the given model id
    #[error("model artifact cannot be found: {0}")]
    ModelNotFound(i64),

    /// The artifact resolved for a model id is not a Model
    #[error("artifact {id} is not an instance of Model: has type id {type_id}, expected {expected_type_id}")]
    NotAModel {
        /// Id of the offending artifact
        id: i64,
        /// Type id the artifact actually carries
        type_id: i64,
        /// Type id of the resolved Model artifact type
        expected_type_id: i64,
    },

    /// An eval result slice key is not a sequence of (name, value) pairs
    #[error("expected slice keys to be sequences of (name, value) pairs; found {0}")]
    InvalidSliceKey(String),

    /// An eval result metric value carries neither of the two known shapes
    #[error("expected a doubleValue or boundedValue metric value; found {0}")]
    UnexpectedMetricValue(String),

    /// An eval result format hint names a format this crate cannot read
    #[error("unsupported eval result format: {0}")]
    UnsupportedEvalFormat(String),

    /// A statistics payload exists but cannot be used
    #[error("statistics payload error: {0}")]
    StatsPayload(String),

    /// Store communication failure reported by a `MetadataStore` backend
    #[error("metadata store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protobuf decode error (statistics payloads)
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// JSON error (eval result payloads, card serialization)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
