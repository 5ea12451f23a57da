use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::LinkDef;
use crate::schema::inflector::{Inflector, SuffixInflector};

/// Read-only description of the model types a payload may carry.
pub trait SchemaView {
    /// Declared relationships of `model`, or `None` if the model is unknown.
    fn model_links(&self, model: &str) -> Option<&BTreeMap<String, LinkDef>>;

    fn pluralize(&self, model: &str) -> String;

    fn singularize(&self, key: &str) -> String;

    /// Attribute holding the record's remote id on the wire.
    fn primary_key_field(&self, model: &str) -> &str;

    /// Name of the local identifier field.
    fn id_field(&self) -> &str;

    fn link(&self, model: &str, link: &str) -> Option<&LinkDef> {
        self.model_links(model)?.get(link)
    }

    /// True when the local id and the remote id live under the same field.
    /// The field then carries the registered remote id on the wire.
    fn shares_id_field(&self, model: &str) -> bool {
        self.id_field() == self.primary_key_field(model)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDef {
    pub primary_key: Option<String>,
    pub links: BTreeMap<String, LinkDef>,
}

impl ModelDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    pub fn has_one(mut self, link: impl Into<String>, model: impl Into<String>) -> Self {
        self.links.insert(link.into(), LinkDef::has_one(model));
        self
    }

    pub fn has_many(mut self, link: impl Into<String>, model: impl Into<String>) -> Self {
        self.links.insert(link.into(), LinkDef::has_many(model));
        self
    }
}

pub struct Schema {
    id_field: String,
    remote_id_field: String,
    models: BTreeMap<String, ModelDef>,
    inflector: Box<dyn Inflector>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id_field", &self.id_field)
            .field("remote_id_field", &self.remote_id_field)
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl Schema {
    pub fn new(id_field: impl Into<String>, remote_id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            remote_id_field: remote_id_field.into(),
            models: BTreeMap::new(),
            inflector: Box::new(SuffixInflector::new()),
        }
    }

    pub fn with_model(mut self, name: impl Into<String>, def: ModelDef) -> Self {
        self.models.insert(name.into(), def);
        self
    }

    pub fn with_inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Box::new(inflector);
        self
    }

    pub fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelDef)> {
        self.models.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn remote_id_field(&self) -> &str {
        &self.remote_id_field
    }
}

impl SchemaView for Schema {
    fn model_links(&self, model: &str) -> Option<&BTreeMap<String, LinkDef>> {
        self.models.get(model).map(|m| &m.links)
    }

    fn pluralize(&self, model: &str) -> String {
        self.inflector.pluralize(model)
    }

    fn singularize(&self, key: &str) -> String {
        self.inflector.singularize(key)
    }

    fn primary_key_field(&self, model: &str) -> &str {
        self.models
            .get(model)
            .and_then(|m| m.primary_key.as_deref())
            .unwrap_or(&self.remote_id_field)
    }

    fn id_field(&self) -> &str {
        &self.id_field
    }
}
