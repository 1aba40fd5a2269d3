//! Schema-constrained request shape sent to the AI endpoint.

use serde_json::Value;
use tasknest_core::ModelPreset;

/// One structured-output request.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub model: ModelPreset,
    /// System instruction.
    pub instructions: String,
    /// User content.
    pub input: String,
    /// Name of the JSON schema, reported back by the endpoint.
    pub schema_name: &'static str,
    /// Strict JSON schema the response must follow.
    pub schema: Value,
}

impl AiRequest {
    /// Builds the wire body for the responses endpoint.
    pub fn to_body(&self) -> Value {
        serde_json::json!({
            "model": self.model.as_str(),
            "instructions": self.instructions,
            "input": self.input,
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": self.schema_name,
                    "strict": true,
                    "schema": self.schema,
                }
            }
        })
    }
}
