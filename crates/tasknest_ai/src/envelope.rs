//! Response envelope decoding.
//!
//! The endpoint wraps the model's JSON text in an envelope whose shape
//! depends on the response mode. Text is recovered by trying an ordered list
//! of extraction strategies; the first non-blank hit wins. New envelope
//! shapes are supported by appending a strategy.

use serde_json::Value;

use crate::error::{AiError, AiResult};

/// One way of locating the model's text inside an envelope.
type ExtractStrategy = fn(&Value) -> Option<&str>;

const EXTRACT_STRATEGIES: &[(&str, ExtractStrategy)] = &[
    ("output_text", top_level_output_text),
    ("output_content", first_content_block_text),
];

/// Recovers the model's text from a response envelope.
pub fn extract_text(envelope: &Value) -> Option<&str> {
    EXTRACT_STRATEGIES.iter().find_map(|(name, strategy)| {
        let text = strategy(envelope)?;
        log::debug!("event=ai_extract module=ai status=ok strategy={}", name);
        Some(text)
    })
}

/// Extracts, parses and shape-checks the structured payload.
///
/// Returns the parsed JSON object once it is known to carry an array under
/// `required_field`.
///
/// # Errors
/// `AiError::InvalidResponse` when no text can be extracted, the text is not
/// JSON, or the required array is missing.
pub fn decode_payload(envelope: &Value, required_field: &str) -> AiResult<Value> {
    let text = extract_text(envelope)
        .ok_or_else(|| AiError::invalid_response("response contained no text output"))?;

    let payload: Value = serde_json::from_str(text)
        .map_err(|e| AiError::invalid_response(format!("output is not valid JSON: {}", e)))?;

    if !payload.get(required_field).is_some_and(Value::is_array) {
        return Err(AiError::invalid_response(format!(
            "output is missing the `{}` array",
            required_field
        )));
    }
    Ok(payload)
}

fn top_level_output_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("output_text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn first_content_block_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
}
