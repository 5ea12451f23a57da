// JSON:API serializer: schema + shared registry + record store, behind one capability
use serde_json::Value;
use tracing::debug;

use crate::core::error::SerializerError;
use crate::core::normalize::{self, NormalizedGraph, RecordNormalizer, SchemaRecordNormalizer};
use crate::core::record::Record;
use crate::core::registry::SharedIdRegistry;
use crate::core::serialize::{self, SerializedPayload};
use crate::schema::SchemaView;

/// Two-way translation between local records and a wire payload.
pub trait Serializer {
    fn serialize(&self, model: &str, record: &Record) -> Result<SerializedPayload, SerializerError>;

    fn deserialize(&self, model: &str, payload: &Value) -> Result<NormalizedGraph, SerializerError>;
}

pub struct JsonApiSerializer<S, N = SchemaRecordNormalizer> {
    schema: S,
    registry: SharedIdRegistry,
    store: N,
}

impl<S: SchemaView> JsonApiSerializer<S> {
    pub fn new(schema: S, registry: SharedIdRegistry) -> Self {
        Self { schema, registry, store: SchemaRecordNormalizer }
    }
}

impl<S: SchemaView, N: RecordNormalizer> JsonApiSerializer<S, N> {
    pub fn with_record_normalizer(schema: S, registry: SharedIdRegistry, store: N) -> Self {
        Self { schema, registry, store }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn registry(&self) -> &SharedIdRegistry {
        &self.registry
    }

    pub fn key_from_type(&self, model: &str) -> String {
        self.schema.pluralize(model)
    }

    pub fn type_from_key(&self, key: &str) -> String {
        self.schema.singularize(key)
    }

    pub fn serialize_many(&self, model: &str, records: &[Record]) -> Result<SerializedPayload, SerializerError> {
        let registry = self.registry.lock();
        serialize::serialize_many(&self.schema, &registry, model, records)
    }

    /// First pass only: records built, links still pending on each record.
    pub fn normalize(&self, model: &str, payload: &Value) -> Result<NormalizedGraph, SerializerError> {
        let mut registry = self.registry.lock();
        normalize::normalize(&self.schema, &mut registry, &self.store, model, payload)
    }

    pub fn assign_links(&self, graph: &mut NormalizedGraph) -> Result<(), SerializerError> {
        let mut registry = self.registry.lock();
        graph.assign_links(&self.schema, &mut registry)
    }
}

impl<S: SchemaView, N: RecordNormalizer> Serializer for JsonApiSerializer<S, N> {
    fn serialize(&self, model: &str, record: &Record) -> Result<SerializedPayload, SerializerError> {
        let registry = self.registry.lock();
        serialize::serialize(&self.schema, &registry, model, record)
    }

    fn deserialize(&self, model: &str, payload: &Value) -> Result<NormalizedGraph, SerializerError> {
        //one lock for both passes: concurrent payloads never interleave id generation
        let mut registry = self.registry.lock();
        let mut graph = normalize::normalize(&self.schema, &mut registry, &self.store, model, payload)?;
        graph.assign_links(&self.schema, &mut registry)?;
        debug!(model, records = graph.len(), "deserialized payload");
        Ok(graph)
    }
}
