//! Strict JSON schemas for structured output.
//!
//! Strict mode requires `additionalProperties: false` and every property to
//! be listed under `required` at every object level.

use serde_json::{json, Value};

/// Upper bound of sub-tasks per generation call.
pub const MAX_GENERATED_SUB_TASKS: usize = 4;

pub const SUB_TASKS_SCHEMA_NAME: &str = "subtask_list";
pub const RANKING_SCHEMA_NAME: &str = "todo_ranking";

/// Top-level array field of the sub-task payload.
pub const SUB_TASKS_FIELD: &str = "subtasks";
/// Top-level array field of the ranking payload.
pub const RANKINGS_FIELD: &str = "rankings";

/// `{ "subtasks": [ { "text": string } ] }` with at most four items.
pub fn sub_tasks_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            SUB_TASKS_FIELD: {
                "type": "array",
                "maxItems": MAX_GENERATED_SUB_TASKS,
                "items": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" }
                    },
                    "required": ["text"],
                    "additionalProperties": false
                }
            }
        },
        "required": [SUB_TASKS_FIELD],
        "additionalProperties": false
    })
}

/// `{ "rankings": [ { "id": string, "priority": integer } ] }`.
pub fn ranking_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            RANKINGS_FIELD: {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "priority": { "type": "integer", "minimum": 1, "maximum": 5 }
                    },
                    "required": ["id", "priority"],
                    "additionalProperties": false
                }
            }
        },
        "required": [RANKINGS_FIELD],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_strict_object(schema: &Value) {
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        let properties = schema["properties"].as_object().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        for key in properties.keys() {
            assert!(required.contains(&key.as_str()), "{key} not required");
        }
    }

    #[test]
    fn test_sub_tasks_schema_is_strict_at_every_level() {
        let schema = sub_tasks_schema();
        assert_strict_object(&schema);
        assert_strict_object(&schema["properties"]["subtasks"]["items"]);
        assert_eq!(schema["properties"]["subtasks"]["maxItems"], 4);
    }

    #[test]
    fn test_ranking_schema_is_strict_at_every_level() {
        let schema = ranking_schema();
        assert_strict_object(&schema);
        let item = &schema["properties"]["rankings"]["items"];
        assert_strict_object(item);
        assert_eq!(item["properties"]["priority"]["type"], "integer");
    }
}
