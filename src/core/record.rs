// local record representation
use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::core::types::{Cardinality, LocalId, RemoteId};

/// Value of one relationship on a local record.
///
/// The variant follows the declared cardinality: `One`/`Many` are resolved
/// local ids, `Opaque` is a raw value the schema does not describe and is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipValue {
    One(Option<LocalId>),
    Many(BTreeSet<LocalId>),
    Opaque(Value),
}

impl RelationshipValue {
    pub fn empty(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::One => RelationshipValue::One(None),
            Cardinality::Many => RelationshipValue::Many(BTreeSet::new()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RelationshipValue::One(_) => "hasOne",
            RelationshipValue::Many(_) => "hasMany",
            RelationshipValue::Opaque(_) => "opaque",
        }
    }

    pub fn as_one(&self) -> Option<LocalId> {
        match self {
            RelationshipValue::One(id) => *id,
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&BTreeSet<LocalId>> {
        match self {
            RelationshipValue::Many(ids) => Some(ids),
            _ => None,
        }
    }
}

/// Local-only bookkeeping. Never emitted to the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMeta {
    /// link payloads that could not be read as relationships
    pub links: BTreeMap<String, Value>,
    pub normalized: bool,
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub model: String,
    pub id: LocalId,
    pub attributes: Map<String, Value>,
    pub relationships: BTreeMap<String, RelationshipValue>,
    pub meta: RecordMeta,
    /// Wire `links` block waiting for the link-assignment pass.
    pub links: Option<Map<String, Value>>,
}

impl Record {
    pub fn new(model: impl Into<String>, id: LocalId) -> Self {
        Self {
            model: model.into(),
            id,
            attributes: Map::new(),
            relationships: BTreeMap::new(),
            meta: RecordMeta::default(),
            links: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_one(mut self, link: impl Into<String>, id: Option<LocalId>) -> Self {
        self.relationships.insert(link.into(), RelationshipValue::One(id));
        self
    }

    pub fn with_many(mut self, link: impl Into<String>, ids: impl IntoIterator<Item = LocalId>) -> Self {
        self.relationships
            .insert(link.into(), RelationshipValue::Many(ids.into_iter().collect()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn relationship(&self, link: &str) -> Option<&RelationshipValue> {
        self.relationships.get(link)
    }

    //own remote id as stored under the primary key attribute, if it has one yet
    pub fn remote_id(&self, primary_key: &str) -> Option<RemoteId> {
        self.attributes.get(primary_key).and_then(RemoteId::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_relationship_follows_cardinality() {
        assert_eq!(RelationshipValue::empty(Cardinality::One), RelationshipValue::One(None));
        assert_eq!(
            RelationshipValue::empty(Cardinality::Many),
            RelationshipValue::Many(BTreeSet::new())
        );
    }

    #[test]
    fn builder_sets_attributes_and_relationships() {
        let r = Record::new("article", LocalId(3))
            .with_attribute("id", "1")
            .with_attribute("title", "Hi")
            .with_one("author", Some(LocalId(7)))
            .with_many("comments", [LocalId(9), LocalId(8), LocalId(9)]);

        assert_eq!(r.attribute("title"), Some(&json!("Hi")));
        assert_eq!(r.remote_id("id"), Some(RemoteId::from("1")));
        assert_eq!(r.relationship("author").unwrap().as_one(), Some(LocalId(7)));
        assert_eq!(r.relationship("comments").unwrap().as_many().unwrap().len(), 2);
        assert!(!r.meta.normalized);
    }
}
