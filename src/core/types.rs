// identifiers + link definitions shared by both directions
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-side identifier, unique per registry lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(pub u64);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier issued by the authoritative store.
///
/// Equality and hashing go through the canonical string form, so `9` and `"9"`
/// name the same remote resource. The variant is kept so the value goes back
/// out on the wire in the shape it arrived in.
#[derive(Debug, Clone)]
pub enum RemoteId {
    Str(String),
    Int(i64),
}

impl RemoteId {
    //only strings and integral numbers are ids; anything else is an opaque link value
    pub fn from_value(value: &Value) -> Option<RemoteId> {
        match value {
            Value::String(s) => Some(RemoteId::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(RemoteId::Int),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RemoteId::Str(s) => Value::String(s.clone()),
            RemoteId::Int(n) => Value::from(*n),
        }
    }

    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            RemoteId::Str(s) => Cow::Borrowed(s.as_str()),
            RemoteId::Int(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl PartialEq for RemoteId {
    fn eq(&self, other: &Self) -> bool {
        self.as_key() == other.as_key()
    }
}

impl Eq for RemoteId {}

impl Hash for RemoteId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<&str> for RemoteId {
    fn from(s: &str) -> Self {
        RemoteId::Str(s.to_string())
    }
}

impl From<String> for RemoteId {
    fn from(s: String) -> Self {
        RemoteId::Str(s)
    }
}

impl From<i64> for RemoteId {
    fn from(n: i64) -> Self {
        RemoteId::Int(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "hasOne")]
    One,
    #[serde(rename = "hasMany")]
    Many,
}

/// A declared relationship: which model it points at and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDef {
    pub model: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
}

impl LinkDef {
    pub fn has_one(model: impl Into<String>) -> Self {
        Self { model: model.into(), cardinality: Cardinality::One }
    }

    pub fn has_many(model: impl Into<String>) -> Self {
        Self { model: model.into(), cardinality: Cardinality::Many }
    }
}
