// schema definitions loaded from .toon or .json text
use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::core::error::SchemaError;
use crate::core::types::LinkDef;
use crate::schema::inflector::SuffixInflector;
use crate::schema::view::{ModelDef, Schema};

fn default_id_field() -> String {
    "__id".to_string()
}

fn default_remote_id_field() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub links: BTreeMap<String, LinkDef>,
}

/// Serialized form of a [`Schema`].
///
/// ```text
/// idField: __id
/// remoteIdField: id
/// irregular:
///   person: people
/// models:
///   article:
///     links:
///       author:
///         model: person
///         type: hasOne
///   person:
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_remote_id_field")]
    pub remote_id_field: String,
    #[serde(default)]
    pub models: BTreeMap<String, Option<ModelDefinition>>,
    /// singular -> plural overrides for the default inflector
    #[serde(default)]
    pub irregular: BTreeMap<String, String>,
}

impl SchemaDefinition {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toon(text: &str) -> Result<Self, SchemaError> {
        let value: Value = toon_format::decode_default(text).map_err(|e| SchemaError::Toon(e.to_string()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Build the schema, checking that every link points at a declared model.
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        for (model, def) in &self.models {
            let Some(def) = def else { continue };
            for (link, link_def) in &def.links {
                if !self.models.contains_key(&link_def.model) {
                    return Err(SchemaError::UnknownTarget {
                        model: model.clone(),
                        link: link.clone(),
                        target: link_def.model.clone(),
                    });
                }
            }
        }

        let inflector = self
            .irregular
            .into_iter()
            .fold(SuffixInflector::new(), |inf, (singular, plural)| inf.with_irregular(singular, plural));

        let schema = self.models.into_iter().fold(
            Schema::new(self.id_field, self.remote_id_field).with_inflector(inflector),
            |schema, (name, def)| {
                let def = def.unwrap_or(ModelDefinition { primary_key: None, links: BTreeMap::new() });
                schema.with_model(name, ModelDef { primary_key: def.primary_key, links: def.links })
            },
        );
        Ok(schema)
    }
}
