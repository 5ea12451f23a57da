pub mod error;
pub mod links;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod serialize;
pub mod types;
