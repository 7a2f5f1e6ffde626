pub mod manifest;
pub mod schema;

pub use manifest::{assert_valid, validate_manifest};
pub use schema::{DocumentType, SchemaError, SchemaValidator, SchemaViolation};
