// wire -> local, first pass: one Record per wire-record, links left pending
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::error::SerializerError;
use crate::core::record::{Record, RelationshipValue};
use crate::core::registry::IdRegistry;
use crate::core::types::RemoteId;
use crate::schema::SchemaView;

pub const LINKED_KEY: &str = "linked";
pub const LINKS_KEY: &str = "links";

/// Primary section of a normalized payload: one record or an ordered batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    One(Record),
    Many(Vec<Record>),
}

impl Primary {
    pub fn records(&self) -> &[Record] {
        match self {
            Primary::One(r) => std::slice::from_ref(r),
            Primary::Many(rs) => rs,
        }
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        match self {
            Primary::One(r) => std::slice::from_mut(r),
            Primary::Many(rs) => rs,
        }
    }
}

/// Local record graph produced from one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGraph {
    pub model: String,
    pub primary: Primary,
    /// side-loaded records by singular model name, in payload order
    pub linked: IndexMap<String, Vec<Record>>,
}

impl NormalizedGraph {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.primary
            .records()
            .iter()
            .chain(self.linked.values().flat_map(|rs| rs.iter()))
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record-store seam: builds a single local record from a wire-record
/// (own-id assignment, attribute shaping). Relationship links are left on
/// `Record::links` for the link-assignment pass.
pub trait RecordNormalizer {
    fn normalize_record(
        &self,
        schema: &dyn SchemaView,
        registry: &mut IdRegistry,
        model: &str,
        wire: &Map<String, Value>,
    ) -> Result<Record, SerializerError>;
}

/// Default record normalization driven by the schema alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRecordNormalizer;

impl RecordNormalizer for SchemaRecordNormalizer {
    fn normalize_record(
        &self,
        schema: &dyn SchemaView,
        registry: &mut IdRegistry,
        model: &str,
        wire: &Map<String, Value>,
    ) -> Result<Record, SerializerError> {
        let link_defs = schema
            .model_links(model)
            .ok_or_else(|| SerializerError::UnknownModel(model.to_string()))?;
        let primary_key = schema.primary_key_field(model);

        //own id: reuse the registered pairing, otherwise mint one
        let id = match wire.get(primary_key) {
            None | Some(Value::Null) => registry.generate_local_id(),
            Some(value) => {
                let remote = RemoteId::from_value(value).ok_or_else(|| {
                    SerializerError::InvalidRemoteId { model: model.to_string(), value: value.clone() }
                })?;
                registry.resolve_or_generate(model, &remote)?
            }
        };

        let mut record = Record::new(model, id);
        for (name, value) in wire {
            if name == LINKS_KEY {
                match value {
                    Value::Object(links) => record.links = Some(links.clone()),
                    Value::Null => {}
                    other => warn!(model, links = %other, "ignoring links block that is not an object"),
                }
                continue;
            }
            record.attributes.insert(name.clone(), value.clone());
        }

        for (name, def) in link_defs {
            record
                .relationships
                .insert(name.clone(), RelationshipValue::empty(def.cardinality));
        }
        record.meta.normalized = true;

        Ok(record)
    }
}

//a section is only usable if every element is an object
fn object_items(items: &[Value]) -> Option<Vec<&Map<String, Value>>> {
    items.iter().map(Value::as_object).collect()
}

enum PrimaryWire<'a> {
    One(&'a Map<String, Value>),
    Many(Vec<&'a Map<String, Value>>),
}

/// First pass over a payload: primary section, then every `linked` section.
///
/// Every section is shape-checked before the first record is built, so a
/// rejected payload leaves the registry untouched. Link assignment is a
/// separate pass (see `NormalizedGraph::assign_links`) that must only run once
/// every record in the batch exists.
pub fn normalize(
    schema: &dyn SchemaView,
    registry: &mut IdRegistry,
    store: &dyn RecordNormalizer,
    model: &str,
    payload: &Value,
) -> Result<NormalizedGraph, SerializerError> {
    let key = schema.pluralize(model);

    let primary_wire = match payload.get(&key) {
        None | Some(Value::Null) => return Err(SerializerError::MissingPrimary { key }),
        Some(Value::Object(wire)) => PrimaryWire::One(wire),
        Some(Value::Array(items)) => match object_items(items) {
            Some(wires) => PrimaryWire::Many(wires),
            None => return Err(SerializerError::MalformedPrimary { key }),
        },
        Some(_) => return Err(SerializerError::MalformedPrimary { key }),
    };

    let mut linked_wire: Vec<(String, Vec<&Map<String, Value>>)> = Vec::new();
    match payload.get(LINKED_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::Object(sections)) => {
            for (rel_key, rel_data) in sections {
                let wires = rel_data
                    .as_array()
                    .and_then(|items| object_items(items))
                    .ok_or_else(|| SerializerError::MalformedLinked { key: rel_key.clone() })?;
                linked_wire.push((schema.singularize(rel_key), wires));
            }
        }
        Some(_) => return Err(SerializerError::MalformedLinked { key: LINKED_KEY.to_string() }),
    }

    for m in std::iter::once(model).chain(linked_wire.iter().map(|(m, _)| m.as_str())) {
        if schema.model_links(m).is_none() {
            return Err(SerializerError::UnknownModel(m.to_string()));
        }
    }

    //shapes are good, now build records (this is where ids get minted)
    let primary = match primary_wire {
        PrimaryWire::One(wire) => Primary::One(store.normalize_record(schema, registry, model, wire)?),
        PrimaryWire::Many(wires) => {
            let mut records = Vec::with_capacity(wires.len());
            for wire in wires {
                records.push(store.normalize_record(schema, registry, model, wire)?);
            }
            Primary::Many(records)
        }
    };

    let mut linked: IndexMap<String, Vec<Record>> = IndexMap::new();
    for (rel_model, wires) in linked_wire {
        let mut records = Vec::with_capacity(wires.len());
        for wire in wires {
            records.push(store.normalize_record(schema, registry, &rel_model, wire)?);
        }
        linked.entry(rel_model).or_default().extend(records);
    }

    let graph = NormalizedGraph { model: model.to_string(), primary, linked };
    debug!(model, records = graph.len(), "normalized payload");
    Ok(graph)
}
