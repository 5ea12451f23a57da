// local -> wire
use serde_json::{Map, Value};
use tracing::warn;

use crate::core::error::{SerializerError, UnresolvedReference};
use crate::core::normalize::LINKS_KEY;
use crate::core::record::{Record, RelationshipValue};
use crate::core::registry::IdRegistry;
use crate::core::types::{Cardinality, LocalId};
use crate::schema::SchemaView;

/// Wire payload plus every relationship member that had no remote id.
///
/// Unresolved has-one links are left out of `links`; unresolved has-many
/// members are left out of their array.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedPayload {
    pub payload: Value,
    pub unresolved: Vec<UnresolvedReference>,
}

impl SerializedPayload {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl Record {
    /// Wire-record for this record, without the type envelope.
    ///
    /// Reads the registry only. Bookkeeping (`meta`, pending links) never
    /// reaches the output.
    pub fn to_wire(
        &self,
        schema: &dyn SchemaView,
        registry: &IdRegistry,
        unresolved: &mut Vec<UnresolvedReference>,
    ) -> Result<Map<String, Value>, SerializerError> {
        let link_defs = schema
            .model_links(&self.model)
            .ok_or_else(|| SerializerError::UnknownModel(self.model.clone()))?;

        //the wire id is always the remote one; a local id never leaves the client
        let mut out = self.attributes.clone();
        if !schema.shares_id_field(&self.model) {
            out.remove(schema.id_field());
        } else if let Some(remote) = registry.local_to_remote(&self.model, self.id) {
            out.insert(schema.id_field().to_string(), remote.to_value());
        }
        out.remove(LINKS_KEY);

        let mut unresolved_member = |link: &str, target: &str, local: LocalId| {
            warn!(model = %self.model, link, target_model = target, %local, "relationship member has no remote id");
            unresolved.push(UnresolvedReference {
                model: self.model.clone(),
                link: link.to_string(),
                target: target.to_string(),
                local,
            });
        };

        let mut links = Map::new();
        for (name, value) in &self.relationships {
            let def = match (link_defs.get(name), value) {
                (_, RelationshipValue::Opaque(raw)) => {
                    links.insert(name.clone(), raw.clone());
                    continue;
                }
                (Some(def), _) => def,
                (None, _) => {
                    return Err(SerializerError::UnknownLink { model: self.model.clone(), link: name.clone() });
                }
            };

            match (def.cardinality, value) {
                (Cardinality::Many, RelationshipValue::Many(ids)) => {
                    let remotes: Vec<Value> = ids
                        .iter()
                        .filter_map(|&local| match registry.local_to_remote(&def.model, local) {
                            Some(remote) => Some(remote.to_value()),
                            None => {
                                unresolved_member(name, &def.model, local);
                                None
                            }
                        })
                        .collect();
                    links.insert(name.clone(), Value::Array(remotes));
                }
                (Cardinality::One, RelationshipValue::One(Some(local))) => {
                    match registry.local_to_remote(&def.model, *local) {
                        Some(remote) => {
                            links.insert(name.clone(), remote.to_value());
                        }
                        None => unresolved_member(name, &def.model, *local),
                    }
                }
                (Cardinality::One, RelationshipValue::One(None)) => {
                    links.insert(name.clone(), Value::Null);
                }
                (expected, other) => {
                    return Err(SerializerError::CardinalityMismatch {
                        model: self.model.clone(),
                        link: name.clone(),
                        expected,
                        found: other.kind_name(),
                    });
                }
            }
        }

        if !links.is_empty() {
            out.insert(LINKS_KEY.to_string(), Value::Object(links));
        }
        Ok(out)
    }
}

fn expect_model(model: &str, record: &Record) -> Result<(), SerializerError> {
    if record.model != model {
        return Err(SerializerError::ModelMismatch { expected: model.to_string(), found: record.model.clone() });
    }
    Ok(())
}

fn envelope(schema: &dyn SchemaView, model: &str, body: Value) -> Value {
    let mut payload = Map::new();
    payload.insert(schema.pluralize(model), body);
    Value::Object(payload)
}

/// `{ <plural model>: <wire-record> }` for a single record.
pub fn serialize(
    schema: &dyn SchemaView,
    registry: &IdRegistry,
    model: &str,
    record: &Record,
) -> Result<SerializedPayload, SerializerError> {
    expect_model(model, record)?;
    let mut unresolved = Vec::new();
    let wire = record.to_wire(schema, registry, &mut unresolved)?;
    Ok(SerializedPayload { payload: envelope(schema, model, Value::Object(wire)), unresolved })
}

/// `{ <plural model>: [<wire-record>, ...] }`, keeping input order.
pub fn serialize_many(
    schema: &dyn SchemaView,
    registry: &IdRegistry,
    model: &str,
    records: &[Record],
) -> Result<SerializedPayload, SerializerError> {
    for record in records {
        expect_model(model, record)?;
    }
    let mut unresolved = Vec::new();
    let wires = records
        .iter()
        .map(|r| r.to_wire(schema, registry, &mut unresolved).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SerializedPayload { payload: envelope(schema, model, Value::Array(wires)), unresolved })
}
