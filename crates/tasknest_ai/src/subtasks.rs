//! Sub-task generation.
//!
//! # Responsibility
//! - Ask the model for up to four new steps of one todo.
//! - Re-sanitize whatever comes back before it reaches the state engine.
//!
//! # Invariants
//! - A blank API key fails before any network call.
//! - Returned texts are trimmed, non-empty, distinct, absent from the
//!   existing texts, and at most `MAX_GENERATED_SUB_TASKS` long.

use serde_json::Value;
use std::collections::HashSet;
use tasknest_core::AppSettings;

use crate::envelope::decode_payload;
use crate::error::{AiError, AiResult};
use crate::request::AiRequest;
use crate::schema::{
    sub_tasks_schema, MAX_GENERATED_SUB_TASKS, SUB_TASKS_FIELD, SUB_TASKS_SCHEMA_NAME,
};
use crate::transport::AiTransport;

const INSTRUCTIONS: &str = "You break a personal task into small, concrete next steps. \
Return between 0 and 4 short steps, each an actionable phrase of a few words. \
Never repeat a step the user already has. \
Return no steps if the task is already trivial or fully covered.";

/// Requests new sub-task texts for `todo_text`.
///
/// `existing_texts` are the todo's current sub-task texts; they are sent to
/// the model and filtered out of the result.
///
/// # Errors
/// - `AiError::MissingCredential` when no API key is configured.
/// - Transport and decoding failures as `Endpoint` / `InvalidResponse`.
pub async fn generate_sub_tasks(
    todo_text: &str,
    existing_texts: &[String],
    settings: &AppSettings,
    transport: &dyn AiTransport,
) -> AiResult<Vec<String>> {
    if !settings.has_api_key() {
        log::warn!("event=ai_generate module=ai status=error error_code=missing_api_key");
        return Err(AiError::MissingCredential);
    }

    let request = AiRequest {
        model: settings.model,
        instructions: INSTRUCTIONS.to_string(),
        input: build_input(todo_text, existing_texts),
        schema_name: SUB_TASKS_SCHEMA_NAME,
        schema: sub_tasks_schema(),
    };

    let envelope = transport.send(&settings.api_key, &request).await?;
    let payload = decode_payload(&envelope, SUB_TASKS_FIELD)?;
    let raw_items = payload[SUB_TASKS_FIELD].as_array().map(Vec::as_slice).unwrap_or_default();

    let texts = sanitize_generated(raw_items, existing_texts);
    log::info!(
        "event=ai_generate module=ai status=ok received={} kept={}",
        raw_items.len(),
        texts.len()
    );
    Ok(texts)
}

/// Filters raw `{text}` items down to usable sub-task texts.
///
/// Non-object items and items without a string `text` are skipped.
pub fn sanitize_generated(raw_items: &[Value], existing_texts: &[String]) -> Vec<String> {
    let existing: HashSet<&str> = existing_texts.iter().map(|text| text.trim()).collect();
    let mut seen = HashSet::new();

    raw_items
        .iter()
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .map(str::trim)
        .filter(|text| !text.is_empty() && !existing.contains(text))
        .filter(|text| seen.insert(*text))
        .take(MAX_GENERATED_SUB_TASKS)
        .map(str::to_string)
        .collect()
}

fn build_input(todo_text: &str, existing_texts: &[String]) -> String {
    let mut input = format!("Task: {}\n", todo_text.trim());
    if existing_texts.is_empty() {
        input.push_str("Existing steps: none");
    } else {
        input.push_str("Existing steps:");
        for text in existing_texts {
            input.push_str("\n- ");
            input.push_str(text.trim());
        }
    }
    input
}
