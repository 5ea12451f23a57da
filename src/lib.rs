//! Bidirectional translation between a local record graph (records keyed by
//! client-generated ids, relationships held as local-id sets/scalars) and a
//! JSON:API-flavored wire payload (records keyed by pluralized type name,
//! relationships expressed as `links` of remote ids, optional `linked`
//! side-loads).

pub mod core;
pub mod jsonapi;
pub mod schema;

pub use crate::core::error::{SchemaError, SerializerError, UnresolvedReference};
pub use crate::core::normalize::{NormalizedGraph, Primary, RecordNormalizer, SchemaRecordNormalizer};
pub use crate::core::record::{Record, RecordMeta, RelationshipValue};
pub use crate::core::registry::{IdRegistry, SharedIdRegistry};
pub use crate::core::serialize::SerializedPayload;
pub use crate::core::types::{Cardinality, LinkDef, LocalId, RemoteId};
pub use crate::jsonapi::{JsonApiSerializer, Serializer};
pub use crate::schema::{Inflector, ModelDef, Schema, SchemaDefinition, SchemaView, SuffixInflector};
