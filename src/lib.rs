//! # Cardtrail: Model Card Facts from Pipeline Lineage
//!
//! Cardtrail turns the provenance graph a training pipeline leaves behind
//! in its metadata store into the raw material of a model card: which
//! datasets a model was trained on, which statistics describe them, how
//! the model scored on every evaluation slice, and which trainer runs
//! produced it.
//!
//! The crate is read-only with respect to the store. Queries start from a
//! model artifact id, walk the artifact/execution graph one hop at a
//! time, and then read the payload files the discovered artifacts point
//! at.
//!
//! ## Example Usage
//!
//! ```rust
//! use cardtrail::lineage::{self, DATASET_TYPE_NAME, MODEL_TYPE_NAME,
//!     STATS_TYPE_NAME, METRICS_TYPE_NAME, TRAINER_TYPE_NAME};
//! use cardtrail::metadata::{Artifact, EventKind, Execution, MemoryMetadataStore};
//!
//! let mut store = MemoryMetadataStore::new();
//! for name in [DATASET_TYPE_NAME, STATS_TYPE_NAME, MODEL_TYPE_NAME, METRICS_TYPE_NAME] {
//!     store.put_artifact_type(name);
//! }
//! let trainer_type = store.put_execution_type(TRAINER_TYPE_NAME);
//!
//! let model_type = store.put_artifact_type(MODEL_TYPE_NAME);
//! let model_id = store.put_artifact(
//!     Artifact::builder(model_type).uri("/pipelines/demo/Trainer/model/1").build(),
//! );
//! let trainer = store.put_execution(
//!     Execution::builder(trainer_type)
//!         .property("module_file", "taxi_trainer.py")
//!         .build(),
//! );
//! store.put_event_parts(model_id, trainer, EventKind::Output);
//!
//! let card = lineage::generate_model_card(&store, model_id, None)?;
//! assert_eq!(card.model_details.name.as_deref(), Some("taxi_trainer.py"));
//! # Ok::<(), cardtrail::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod card;
pub mod error;
pub mod lineage;
pub mod metadata;
pub mod payload;

pub use error::{Error, Result};
