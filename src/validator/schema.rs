//! JSON Schema lint for raw manifest documents
//!
//! A precondition step, separate from the structural validator: it checks
//! that a raw JSON value has the right shape before the typed model is even
//! built. Schemas ship embedded in the binary.

use jsonschema::Validator;
use serde_json::Value as JsonValue;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to parse embedded {0} schema: {1}")]
    Parse(&'static str, #[source] serde_json::Error),

    #[error("Failed to compile {0} schema: {1}")]
    Compile(&'static str, String),
}

/// Document types with an embedded schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Roadmap,
    Artifacts,
}

impl DocumentType {
    /// Get the schema source for this document type
    pub fn schema_source(&self) -> &'static str {
        match self {
            DocumentType::Roadmap => include_str!("../../schemas/roadmap_manifest.schema.json"),
            DocumentType::Artifacts => include_str!("../../schemas/artifacts_manifest.schema.json"),
        }
    }

    /// Get display name for the document type
    pub fn name(&self) -> &'static str {
        match self {
            DocumentType::Roadmap => "roadmap manifest",
            DocumentType::Artifacts => "artifacts manifest",
        }
    }
}

/// One schema violation, addressed by JSON instance path
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value ("/" for the document root)
    pub instance_path: String,
    pub message: String,
}

impl SchemaViolation {
    /// Format violation for display
    pub fn format(&self) -> String {
        format!("{}: {}", self.instance_path, self.message)
    }
}

/// Schema validator with lazily compiled validators
pub struct SchemaValidator {
    roadmap: Option<Validator>,
    artifacts: Option<Validator>,
}

impl SchemaValidator {
    /// Create a new schema validator
    pub fn new() -> Self {
        Self {
            roadmap: None,
            artifacts: None,
        }
    }

    /// Compile (once) and return the validator for a document type
    fn get_validator(&mut self, doc_type: DocumentType) -> Result<&Validator, SchemaError> {
        let slot = match doc_type {
            DocumentType::Roadmap => &mut self.roadmap,
            DocumentType::Artifacts => &mut self.artifacts,
        };

        if slot.is_none() {
            let schema: JsonValue = serde_json::from_str(doc_type.schema_source())
                .map_err(|e| SchemaError::Parse(doc_type.name(), e))?;

            let validator = Validator::new(&schema)
                .map_err(|e| SchemaError::Compile(doc_type.name(), e.to_string()))?;

            *slot = Some(validator);
        }

        Ok(slot.as_ref().unwrap())
    }

    /// Validate a raw document against its schema, collecting all violations
    pub fn validate(
        &mut self,
        doc_type: DocumentType,
        data: &JsonValue,
    ) -> Result<Vec<SchemaViolation>, SchemaError> {
        let validator = self.get_validator(doc_type)?;

        let violations = validator
            .iter_errors(data)
            .map(|error| {
                let path = error.instance_path.to_string();
                SchemaViolation {
                    instance_path: if path.is_empty() { "/".to_string() } else { path },
                    message: error.to_string(),
                }
            })
            .collect();

        Ok(violations)
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}
