// model descriptions consumed by the serializer and normalizer
pub mod definition;
pub mod inflector;
pub mod view;

pub use definition::{ModelDefinition, SchemaDefinition};
pub use inflector::{Inflector, SuffixInflector};
pub use view::{ModelDef, Schema, SchemaView};
