use serde_json::Value;
use thiserror::Error;

use crate::core::types::{Cardinality, LocalId, RemoteId};

/// Errors returned to the record-store layer by either direction.
#[derive(Debug, Error, PartialEq)]
pub enum SerializerError {
    #[error("payload has no primary section under `{key}`")]
    MissingPrimary { key: String },

    #[error("primary section `{key}` must be an object or an array of objects")]
    MalformedPrimary { key: String },

    #[error("linked section `{key}` must be an array of objects")]
    MalformedLinked { key: String },

    #[error("model `{0}` is not declared in the schema")]
    UnknownModel(String),

    #[error("record of model `{found}` cannot be serialized as `{expected}`")]
    ModelMismatch { expected: String, found: String },

    #[error("relationship `{link}` is not declared on model `{model}`")]
    UnknownLink { model: String, link: String },

    #[error("relationship `{link}` on `{model}` is declared {expected:?} but holds a {found} value")]
    CardinalityMismatch {
        model: String,
        link: String,
        expected: Cardinality,
        found: &'static str,
    },

    #[error("`{model}` local id {local} is already paired with remote id {existing}, refusing {remote}")]
    LocalAlreadyPaired {
        model: String,
        local: LocalId,
        existing: RemoteId,
        remote: RemoteId,
    },

    #[error("`{model}` remote id {remote} is already paired with local id {existing}, refusing {local}")]
    RemoteAlreadyPaired {
        model: String,
        remote: RemoteId,
        existing: LocalId,
        local: LocalId,
    },

    #[error("`{model}` local id {local} is beyond the id counter range")]
    LocalIdOutOfRange { model: String, local: LocalId },

    #[error("record of `{model}` carries an unusable own id: {value}")]
    InvalidRemoteId { model: String, value: Value },
}

/// Errors raised while loading a schema definition.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid schema toon: {0}")]
    Toon(String),

    #[error("link `{link}` on `{model}` targets undeclared model `{target}`")]
    UnknownTarget {
        model: String,
        link: String,
        target: String,
    },
}

/// A relationship member that had no remote id at serialize time.
///
/// Partially persisted graphs are a normal transient state, so these are
/// reported next to the payload instead of failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub model: String,
    pub link: String,
    pub target: String,
    pub local: LocalId,
}
