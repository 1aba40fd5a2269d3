//! AI ranking of incomplete todos.
//!
//! # Responsibility
//! - Ask the model for a full ordering plus a `[1, 5]` priority per todo.
//! - Keep only rankings of todos that were actually sent.
//!
//! # Invariants
//! - Zero or one candidate never touches the network or the credential.
//! - `ordered_ids` is duplicate-free and a subset of the candidate ids.
//! - Every id in `ordered_ids` has exactly one entry in `priorities`.
//!
//! # See also
//! - `tasknest_core::engine::reorder_todos`, which consumes the result.

use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use tasknest_core::engine::reorder_todos;
use tasknest_core::{clamp_rank_priority, AppSettings, AppState, Priority, RankCandidate, TodoId};

use crate::envelope::decode_payload;
use crate::error::{AiError, AiResult};
use crate::request::AiRequest;
use crate::schema::{ranking_schema, RANKINGS_FIELD, RANKING_SCHEMA_NAME};
use crate::transport::AiTransport;

const INSTRUCTIONS: &str = "You prioritize a personal todo list. \
Order every given todo from most to least important and assign each a priority \
from 1 (low) to 5 (urgent). Use only the ids you are given, each exactly once.";

/// Sanitized outcome of a ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingResult {
    pub ordered_ids: Vec<TodoId>,
    pub priorities: BTreeMap<TodoId, Priority>,
}

impl RankingResult {
    /// Feeds the result into `reorder_todos`.
    ///
    /// Todos deleted while the request was in flight are skipped there.
    pub fn apply_to(&self, state: AppState) -> AppState {
        reorder_todos(state, &self.ordered_ids, Some(&self.priorities))
    }
}

/// Ranks `candidates` (incomplete todos in display order).
///
/// # Errors
/// - `AiError::MissingCredential` when two or more candidates are given and
///   no API key is configured.
/// - Transport and decoding failures as `Endpoint` / `InvalidResponse`.
pub async fn rank_todos(
    candidates: &[RankCandidate],
    settings: &AppSettings,
    transport: &dyn AiTransport,
) -> AiResult<RankingResult> {
    match candidates {
        [] => return Ok(RankingResult::default()),
        [only] => {
            log::debug!("event=ai_rank module=ai status=ok shortcut=single");
            return Ok(RankingResult {
                ordered_ids: vec![only.id.clone()],
                priorities: BTreeMap::from([(only.id.clone(), Priority::NEUTRAL)]),
            });
        }
        _ => {}
    }

    if !settings.has_api_key() {
        log::warn!("event=ai_rank module=ai status=error error_code=missing_api_key");
        return Err(AiError::MissingCredential);
    }

    let request = AiRequest {
        model: settings.model,
        instructions: INSTRUCTIONS.to_string(),
        input: build_input(candidates),
        schema_name: RANKING_SCHEMA_NAME,
        schema: ranking_schema(),
    };

    let envelope = transport.send(&settings.api_key, &request).await?;
    let payload = decode_payload(&envelope, RANKINGS_FIELD)?;
    let raw_items = payload[RANKINGS_FIELD].as_array().map(Vec::as_slice).unwrap_or_default();

    let result = sanitize_rankings(raw_items, candidates);
    log::info!(
        "event=ai_rank module=ai status=ok candidates={} received={} kept={}",
        candidates.len(),
        raw_items.len(),
        result.ordered_ids.len()
    );
    Ok(result)
}

/// Filters raw `{id, priority}` items against the candidate ids.
///
/// Unknown ids, repeated ids and items without a string `id` are dropped.
/// Priorities go through the rank clamp.
pub fn sanitize_rankings(raw_items: &[Value], candidates: &[RankCandidate]) -> RankingResult {
    let known: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
    let mut result = RankingResult::default();

    for item in raw_items {
        let Some(id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };
        if !known.contains(id) || result.priorities.contains_key(id) {
            continue;
        }
        let priority = clamp_rank_priority(item.get("priority").unwrap_or(&Value::Null));
        result.ordered_ids.push(id.to_string());
        result.priorities.insert(id.to_string(), priority);
    }
    result
}

fn build_input(candidates: &[RankCandidate]) -> String {
    let todos: Vec<Value> = candidates
        .iter()
        .map(|candidate| json!({ "id": candidate.id, "text": candidate.text }))
        .collect();
    format!("Todos (JSON array of id and text):\n{}", Value::Array(todos))
}
