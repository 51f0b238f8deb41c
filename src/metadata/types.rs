//! Snapshot entities of the pipeline metadata graph.
//!
//! These mirror the shapes owned by the external metadata store: artifacts
//! and executions carry typed property maps, events are the edges linking
//! them. All of them are read-only snapshots fetched per query; nothing in
//! this crate mutates the store.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed property value.
///
/// Exactly one of the three variants is populated, just like the store's
/// value record; readers dispatch on the populated variant rather than on
/// runtime type inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Double(f64),
    /// Text value
    Text(String),
}

impl PropertyValue {
    /// Get the integer value, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the floating point value, if this is a `Double`.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the text value, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Direction tag of an event edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The execution consumed the artifact.
    Input,
    /// The artifact was declared as an input before the execution ran.
    DeclaredInput,
    /// The execution produced the artifact.
    Output,
    /// The artifact was declared as an output before the execution ran.
    DeclaredOutput,
}

/// An edge recording that an execution consumed or produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Id of the artifact end of the edge
    pub artifact_id: i64,
    /// Id of the execution end of the edge
    pub execution_id: i64,
    /// Direction tag
    pub kind: EventKind,
}

impl Event {
    /// Create a new event edge.
    #[must_use]
    pub const fn new(artifact_id: i64, execution_id: i64, kind: EventKind) -> Self {
        Self {
            artifact_id,
            execution_id,
            kind,
        }
    }
}

/// A named artifact type definition registered in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactType {
    /// Type id assigned by the store
    pub id: i64,
    /// Exact type name, matched case-sensitively
    pub name: String,
}

impl ArtifactType {
    /// Create a new artifact type record.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A named execution type definition registered in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionType {
    /// Type id assigned by the store
    pub id: i64,
    /// Exact type name, matched case-sensitively
    pub name: String,
}

impl ExecutionType {
    /// Create a new execution type record.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Common property access for graph nodes (artifacts and executions).
///
/// A missing property name is a normal, expected case and never an error.
pub trait MetadataNode {
    /// Get the node's property map.
    fn properties(&self) -> &HashMap<String, PropertyValue>;

    /// Get the node's custom-property map.
    fn custom_properties(&self) -> &HashMap<String, PropertyValue>;

    /// Look up a property by name in one of the two maps.
    ///
    /// `is_custom` selects the custom-property map instead of the property
    /// map. Returns `None` when the name is not present in the selected
    /// map.
    fn property_value(&self, name: &str, is_custom: bool) -> Option<&PropertyValue> {
        let map = if is_custom {
            self.custom_properties()
        } else {
            self.properties()
        };
        map.get(name)
    }
}

/// A versioned data object tracked by the metadata store.
///
/// An artifact is a dataset, a statistics bundle, a model, or an
/// evaluation output, identified by its type id and located by its storage
/// URI. Ids are assigned by the store; an id of 0 means "not yet stored".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    id: i64,
    type_id: i64,
    uri: String,
    properties: HashMap<String, PropertyValue>,
    custom_properties: HashMap<String, PropertyValue>,
    create_time: DateTime<Utc>,
}

impl Artifact {
    /// Create a builder for an artifact of the given type.
    #[must_use]
    pub fn builder(type_id: i64) -> ArtifactBuilder {
        ArtifactBuilder::new(type_id)
    }

    /// Get the artifact id (0 until assigned by a store).
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Get the artifact's type id.
    #[must_use]
    pub const fn type_id(&self) -> i64 {
        self.type_id
    }

    /// Get the storage location URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl MetadataNode for Artifact {
    fn properties(&self) -> &HashMap<String, PropertyValue> {
        &self.properties
    }

    fn custom_properties(&self) -> &HashMap<String, PropertyValue> {
        &self.custom_properties
    }
}

/// Builder for [`Artifact`].
#[derive(Debug)]
pub struct ArtifactBuilder {
    id: i64,
    type_id: i64,
    uri: String,
    properties: HashMap<String, PropertyValue>,
    custom_properties: HashMap<String, PropertyValue>,
    create_time: DateTime<Utc>,
}

impl ArtifactBuilder {
    /// Create a new builder for an artifact of the given type.
    #[must_use]
    pub fn new(type_id: i64) -> Self {
        Self {
            id: 0,
            type_id,
            uri: String::new(),
            properties: HashMap::new(),
            custom_properties: HashMap::new(),
            create_time: Utc::now(),
        }
    }

    /// Set an explicit id (store backends deserializing existing rows).
    #[must_use]
    pub const fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Set the storage location URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a custom property.
    #[must_use]
    pub fn custom_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.custom_properties.insert(name.into(), value.into());
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = create_time;
        self
    }

    /// Build the [`Artifact`].
    #[must_use]
    pub fn build(self) -> Artifact {
        Artifact {
            id: self.id,
            type_id: self.type_id,
            uri: self.uri,
            properties: self.properties,
            custom_properties: self.custom_properties,
            create_time: self.create_time,
        }
    }
}

/// A recorded run of a pipeline step (e.g. a trainer run).
///
/// Same shape as [`Artifact`] minus the storage URI. Ids are assigned by
/// the store; an id of 0 means "not yet stored".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    id: i64,
    type_id: i64,
    properties: HashMap<String, PropertyValue>,
    custom_properties: HashMap<String, PropertyValue>,
    create_time: DateTime<Utc>,
}

impl Execution {
    /// Create a builder for an execution of the given type.
    #[must_use]
    pub fn builder(type_id: i64) -> ExecutionBuilder {
        ExecutionBuilder::new(type_id)
    }

    /// Get the execution id (0 until assigned by a store).
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Get the execution's type id.
    #[must_use]
    pub const fn type_id(&self) -> i64 {
        self.type_id
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl MetadataNode for Execution {
    fn properties(&self) -> &HashMap<String, PropertyValue> {
        &self.properties
    }

    fn custom_properties(&self) -> &HashMap<String, PropertyValue> {
        &self.custom_properties
    }
}

/// Builder for [`Execution`].
#[derive(Debug)]
pub struct ExecutionBuilder {
    id: i64,
    type_id: i64,
    properties: HashMap<String, PropertyValue>,
    custom_properties: HashMap<String, PropertyValue>,
    create_time: DateTime<Utc>,
}

impl ExecutionBuilder {
    /// Create a new builder for an execution of the given type.
    #[must_use]
    pub fn new(type_id: i64) -> Self {
        Self {
            id: 0,
            type_id,
            properties: HashMap::new(),
            custom_properties: HashMap::new(),
            create_time: Utc::now(),
        }
    }

    /// Set an explicit id (store backends deserializing existing rows).
    #[must_use]
    pub const fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a custom property.
    #[must_use]
    pub fn custom_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.custom_properties.insert(name.into(), value.into());
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = create_time;
        self
    }

    /// Build the [`Execution`].
    #[must_use]
    pub fn build(self) -> Execution {
        Execution {
            id: self.id,
            type_id: self.type_id,
            properties: self.properties,
            custom_properties: self.custom_properties,
            create_time: self.create_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_variants() {
        assert_eq!(PropertyValue::from(42i64).as_int(), Some(42));
        assert_eq!(PropertyValue::from(0.5).as_double(), Some(0.5));
        assert_eq!(PropertyValue::from("abc").as_text(), Some("abc"));

        // Cross-variant access returns None rather than coercing
        assert_eq!(PropertyValue::from(42i64).as_double(), None);
        assert_eq!(PropertyValue::from("abc").as_int(), None);
    }

    #[test]
    fn test_property_value_display() {
        assert_eq!(PropertyValue::from(7i64).to_string(), "7");
        assert_eq!(PropertyValue::from(0.25).to_string(), "0.25");
        assert_eq!(PropertyValue::from("pipeline").to_string(), "pipeline");
    }

    #[test]
    fn test_artifact_builder() {
        let artifact = Artifact::builder(3)
            .uri("/pipelines/demo/Trainer/model/5")
            .property("name", "demo-model")
            .custom_property("state", "published")
            .build();

        assert_eq!(artifact.id(), 0);
        assert_eq!(artifact.type_id(), 3);
        assert_eq!(artifact.uri(), "/pipelines/demo/Trainer/model/5");
        assert_eq!(
            artifact.property_value("name", false),
            Some(&PropertyValue::from("demo-model"))
        );
        assert_eq!(
            artifact.property_value("state", true),
            Some(&PropertyValue::from("published"))
        );
    }

    #[test]
    fn test_property_value_reader_missing_is_none() {
        let execution = Execution::builder(1).property("module_file", "t.py").build();

        assert!(execution.property_value("module_file", false).is_some());
        // Same name in the other map is a miss
        assert!(execution.property_value("module_file", true).is_none());
        assert!(execution.property_value("absent", false).is_none());
    }

    #[test]
    fn test_execution_builder_with_explicit_id() {
        let execution = Execution::builder(2).id(17).build();
        assert_eq!(execution.id(), 17);
        assert_eq!(execution.type_id(), 2);
    }

    #[test]
    fn test_event_new() {
        let event = Event::new(4, 9, EventKind::DeclaredOutput);
        assert_eq!(event.artifact_id, 4);
        assert_eq!(event.execution_id, 9);
        assert_eq!(event.kind, EventKind::DeclaredOutput);
    }

    #[test]
    fn test_artifact_serde_round_trip() {
        let artifact = Artifact::builder(3)
            .uri("/tmp/model")
            .property("blessed", 1i64)
            .build();

        let json = serde_json::to_string(&artifact).expect("serialization failed");
        let back: Artifact = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(artifact, back);
    }
}
