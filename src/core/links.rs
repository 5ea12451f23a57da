// wire -> local, second pass: wire `links` blocks become relationships
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::error::SerializerError;
use crate::core::normalize::NormalizedGraph;
use crate::core::record::{Record, RelationshipValue};
use crate::core::registry::IdRegistry;
use crate::core::types::{Cardinality, RemoteId};
use crate::schema::SchemaView;

impl NormalizedGraph {
    /// Resolve every pending `links` block in the batch.
    ///
    /// Order: primary records, then each linked type as the payload presented
    /// it. That order decides which unseen remote ids get local ids first.
    pub fn assign_links(&mut self, schema: &dyn SchemaView, registry: &mut IdRegistry) -> Result<(), SerializerError> {
        for record in self.primary.records_mut() {
            record.assign_links(schema, registry)?;
        }
        for records in self.linked.values_mut() {
            for record in records.iter_mut() {
                record.assign_links(schema, registry)?;
            }
        }
        Ok(())
    }
}

impl Record {
    /// Consume this record's wire `links` block into `relationships`.
    ///
    /// Links whose shape does not match the declared cardinality, or that the
    /// schema does not declare at all, are kept verbatim in `meta.links`.
    pub fn assign_links(&mut self, schema: &dyn SchemaView, registry: &mut IdRegistry) -> Result<(), SerializerError> {
        let Some(links) = self.links.take() else {
            return Ok(());
        };

        for (name, value) in links {
            let Some(def) = schema.link(&self.model, &name) else {
                debug!(model = %self.model, link = %name, "link not declared, keeping raw value");
                self.meta.links.insert(name, value);
                continue;
            };

            match (def.cardinality, &value) {
                (Cardinality::Many, Value::Array(items)) => {
                    let Some(remotes) = items.iter().map(RemoteId::from_value).collect::<Option<Vec<_>>>() else {
                        warn!(model = %self.model, link = %name, "hasMany link has a member that is not an id");
                        self.meta.links.insert(name, value);
                        continue;
                    };

                    let mut resolved = Vec::with_capacity(remotes.len());
                    for remote in &remotes {
                        resolved.push(registry.resolve_or_generate(&def.model, remote)?);
                    }

                    match self.relationships.get_mut(&name) {
                        Some(RelationshipValue::Many(ids)) => ids.extend(resolved),
                        _ => {
                            self.relationships
                                .insert(name, RelationshipValue::Many(resolved.into_iter().collect()));
                        }
                    }
                }
                (Cardinality::One, Value::String(_) | Value::Number(_)) => match RemoteId::from_value(&value) {
                    Some(remote) => {
                        let local = registry.resolve_or_generate(&def.model, &remote)?;
                        self.relationships.insert(name, RelationshipValue::One(Some(local)));
                    }
                    None => {
                        warn!(model = %self.model, link = %name, "hasOne link is not an integral id");
                        self.meta.links.insert(name, value);
                    }
                },
                (expected, _) => {
                    warn!(model = %self.model, link = %name, ?expected, "link shape does not match cardinality");
                    self.meta.links.insert(name, value);
                }
            }
        }
        Ok(())
    }
}
